//! Watches the open file so edits made by other programs show up live.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounced change notifications for a single file.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce_ms: u64,
    pending_since_ms: Option<u64>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("target_path", &self.target_path)
            .field("debounce_ms", &self.debounce_ms)
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Watch `path`. The parent directory is watched non-recursively because
    /// editors commonly save by replacing the file.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce_ms: u64) -> notify::Result<Self> {
        // OS event paths are canonical.
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %target_path.display(), "watching file");

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            debounce_ms,
            pending_since_ms: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Whether a change is queued but not yet settled.
    pub const fn is_pending(&self) -> bool {
        self.pending_since_ms.is_some()
    }

    /// Drain OS events and return `true` once a change has been quiet for
    /// the debounce interval.
    pub fn take_change_ready(&mut self, now_ms: u64) -> bool {
        if self.drain_events() {
            self.pending_since_ms = Some(now_ms);
        }
        let Some(since) = self.pending_since_ms else {
            return false;
        };
        if now_ms.saturating_sub(since) >= self.debounce_ms {
            self.pending_since_ms = None;
            return true;
        }
        false
    }

    fn drain_events(&self) -> bool {
        let mut relevant = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant = true,
                Ok(ev) => tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignored fs event"),
                Err(err) => tracing::warn!(%err, "file watcher error"),
            }
        }
        relevant
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn event_for(path: PathBuf) -> Event {
        Event {
            kind: EventKind::Any,
            paths: vec![path],
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_sibling_file_events_are_ignored() {
        let dir = tempdir().unwrap();
        let canonical_dir = dir.path().canonicalize().unwrap();
        let path = canonical_dir.join("doc.md");
        std::fs::write(&path, "hi").unwrap();
        let watcher = FileWatcher::new(&path, 10).unwrap();

        assert!(watcher.is_relevant(&event_for(path.clone())));
        assert!(watcher.is_relevant(&event_for(canonical_dir.clone())));
        assert!(!watcher.is_relevant(&event_for(canonical_dir.join("other.md"))));
    }

    #[test]
    fn test_watch_root_for_relative_file_is_dot() {
        assert_eq!(watch_root_for(Path::new("notes.md")), PathBuf::from("."));
    }

    #[test]
    fn test_nothing_ready_without_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quiet.md");
        std::fs::write(&path, "x").unwrap();
        let mut watcher = FileWatcher::new(&path, 0).unwrap();
        assert!(!watcher.take_change_ready(1_000));
        assert!(!watcher.is_pending());
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().unwrap();
        let path = dir.path().canonicalize().unwrap().join("watched.md");
        std::fs::write(&path, "original").unwrap();
        let mut watcher = FileWatcher::new(&path, 50).unwrap();

        std::thread::sleep(Duration::from_millis(300));
        std::fs::write(&path, "modified elsewhere").unwrap();

        let start = Instant::now();
        let deadline = start + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if watcher.take_change_ready(now_ms) {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        assert!(detected, "modification should be reported within 5 seconds");
    }
}
