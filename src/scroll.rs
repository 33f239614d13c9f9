//! Proportional scroll synchronisation between the editor and preview panes.
//!
//! Scrolling one pane moves the other to the same relative position. While a
//! propagated scroll is in flight the opposite pane's own scroll
//! notifications are swallowed, so the two panes never chase each other.

use crate::ui::viewport::Viewport;

/// How long scroll notifications from the follower pane are ignored.
pub const DEFAULT_SYNC_DEBOUNCE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    FromEditor { until_ms: u64 },
    FromPreview { until_ms: u64 },
}

impl SyncState {
    const fn leader(self) -> Option<(Pane, u64)> {
        match self {
            Self::Idle => None,
            Self::FromEditor { until_ms } => Some((Pane::Editor, until_ms)),
            Self::FromPreview { until_ms } => Some((Pane::Preview, until_ms)),
        }
    }

    const fn from(pane: Pane, until_ms: u64) -> Self {
        match pane {
            Pane::Editor => Self::FromEditor { until_ms },
            Pane::Preview => Self::FromPreview { until_ms },
        }
    }
}

/// Sync state machine. See the module docs.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    state: SyncState,
    debounce_ms: u64,
    enabled: bool,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_DEBOUNCE_MS)
    }
}

impl ScrollSync {
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            state: SyncState::Idle,
            debounce_ms,
            enabled: true,
        }
    }

    pub const fn state(&self) -> SyncState {
        self.state
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = SyncState::Idle;
        }
    }

    pub const fn is_pending(&self) -> bool {
        !matches!(self.state, SyncState::Idle)
    }

    /// Record that `source` scrolled. Returns `true` when the scroll should
    /// be propagated to the other pane.
    pub fn on_scroll(&mut self, source: Pane, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        self.settle(now_ms);
        match self.state.leader() {
            Some((leader, _)) if leader != source => {
                tracing::trace!(?source, "scroll swallowed while syncing");
                false
            }
            _ => {
                self.state = SyncState::from(source, now_ms + self.debounce_ms);
                true
            }
        }
    }

    /// Return to idle once the deadline passes. Returns `true` on transition.
    pub fn settle(&mut self, now_ms: u64) -> bool {
        match self.state.leader() {
            Some((_, until_ms)) if now_ms >= until_ms => {
                self.state = SyncState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Map `ref_offset` within `0..=ref_max` onto `0..=target_max`.
pub fn sync_offset(ref_offset: usize, ref_max: usize, target_max: usize) -> usize {
    if ref_max == 0 {
        return 0;
    }
    // Offsets are line counts, far below f64's exact integer range.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    {
        let ratio = ref_offset.min(ref_max) as f64 / ref_max as f64;
        (target_max as f64 * ratio).round() as usize
    }
}

/// Move `target` to the position proportional to `reference`.
pub fn follow(reference: &Viewport, target: &mut Viewport) {
    let offset = sync_offset(
        reference.offset(),
        reference.max_offset(),
        target.max_offset(),
    );
    target.go_to_line(offset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_offset_is_proportional() {
        assert_eq!(sync_offset(50, 100, 40), 20);
        assert_eq!(sync_offset(100, 100, 40), 40);
        assert_eq!(sync_offset(0, 100, 40), 0);
    }

    #[test]
    fn test_sync_offset_rounds() {
        assert_eq!(sync_offset(1, 3, 10), 3);
        assert_eq!(sync_offset(2, 3, 10), 7);
    }

    #[test]
    fn test_sync_offset_zero_range_reference() {
        assert_eq!(sync_offset(0, 0, 40), 0);
        assert_eq!(sync_offset(5, 0, 40), 0);
    }

    #[test]
    fn test_first_scroll_propagates_and_locks_leader() {
        let mut sync = ScrollSync::new(50);
        assert!(sync.on_scroll(Pane::Editor, 1_000));
        assert_eq!(sync.state(), SyncState::FromEditor { until_ms: 1_050 });
    }

    #[test]
    fn test_follower_scroll_is_swallowed_while_syncing() {
        let mut sync = ScrollSync::new(50);
        assert!(sync.on_scroll(Pane::Editor, 1_000));
        assert!(!sync.on_scroll(Pane::Preview, 1_010));
        assert_eq!(sync.state(), SyncState::FromEditor { until_ms: 1_050 });
    }

    #[test]
    fn test_leader_scroll_extends_deadline() {
        let mut sync = ScrollSync::new(50);
        sync.on_scroll(Pane::Preview, 1_000);
        assert!(sync.on_scroll(Pane::Preview, 1_030));
        assert_eq!(sync.state(), SyncState::FromPreview { until_ms: 1_080 });
    }

    #[test]
    fn test_settle_returns_to_idle_at_deadline() {
        let mut sync = ScrollSync::new(50);
        sync.on_scroll(Pane::Editor, 1_000);
        assert!(!sync.settle(1_049));
        assert!(sync.settle(1_050));
        assert_eq!(sync.state(), SyncState::Idle);
        assert!(sync.on_scroll(Pane::Preview, 1_060));
    }

    #[test]
    fn test_expired_deadline_lets_other_pane_lead() {
        let mut sync = ScrollSync::new(50);
        sync.on_scroll(Pane::Editor, 1_000);
        assert!(sync.on_scroll(Pane::Preview, 2_000));
        assert_eq!(sync.state(), SyncState::FromPreview { until_ms: 2_050 });
    }

    #[test]
    fn test_disabled_sync_never_propagates() {
        let mut sync = ScrollSync::default();
        sync.set_enabled(false);
        assert!(!sync.on_scroll(Pane::Editor, 0));
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[test]
    fn test_follow_moves_target_proportionally() {
        let mut editor = Viewport::new(40, 10, 110);
        let mut preview = Viewport::new(40, 10, 60);
        editor.go_to_line(50);
        follow(&editor, &mut preview);
        assert_eq!(preview.offset(), 25);
    }

    #[test]
    fn test_pane_other() {
        assert_eq!(Pane::Editor.other(), Pane::Preview);
        assert_eq!(Pane::Preview.other(), Pane::Editor);
    }
}
