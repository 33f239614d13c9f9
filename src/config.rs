//! Saved command-line defaults and well-known paths.
//!
//! Defaults live in a flag file: whitespace-separated CLI tokens, `#`
//! comments allowed. The global file sits in the platform config dir and a
//! `.mdliverc` in the working directory overrides it; explicit CLI flags
//! override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::PreviewMode;

const APP_DIR: &str = "mdlive";
const LOCAL_RC: &str = ".mdliverc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_sync: bool,
    pub no_restore: bool,
    pub no_watch: bool,
    pub preview: Option<PreviewMode>,
    pub theme: Option<ThemeMode>,
    pub sync_delay_ms: Option<u64>,
    pub template: Option<PathBuf>,
    pub css: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_sync: self.no_sync || other.no_sync,
            no_restore: self.no_restore || other.no_restore,
            no_watch: self.no_watch || other.no_watch,
            preview: other.preview.or(self.preview),
            theme: other.theme.or(self.theme),
            sync_delay_ms: other.sync_delay_ms.or(self.sync_delay_ms),
            template: other.template.clone().or_else(|| self.template.clone()),
            css: other.css.clone().or_else(|| self.css.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

/// Platform config dir for mdlive, falling back to the working directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join(APP_DIR));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(APP_DIR),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(APP_DIR));
        }
    }

    None
}

fn data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            return Some(PathBuf::from(local).join(APP_DIR));
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join(APP_DIR),
            );
        }
    }

    config_dir()
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(|| PathBuf::from(LOCAL_RC), |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_RC)
}

/// Where the last-state store is kept.
pub fn store_path() -> PathBuf {
    data_dir().map_or_else(
        || PathBuf::from(".mdlive-store.json"),
        |dir| dir.join("store.json"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdlive defaults (saved with --save)".to_string()];
    if flags.no_sync {
        lines.push("--no-sync".to_string());
    }
    if flags.no_restore {
        lines.push("--no-restore".to_string());
    }
    if flags.no_watch {
        lines.push("--no-watch".to_string());
    }
    if let Some(mode) = flags.preview {
        let name = match mode {
            PreviewMode::Rendered => "rendered",
            PreviewMode::Html => "html",
        };
        lines.push(format!("--preview {name}"));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.name()));
    }
    if let Some(ms) = flags.sync_delay_ms {
        lines.push(format!("--sync-delay {ms}"));
    }
    let paths = [
        ("--template", &flags.template),
        ("--css", &flags.css),
        ("--log-file", &flags.log_file),
    ];
    for (flag, value) in paths {
        if let Some(path) = value {
            lines.push(format!("{flag} {}", path.display()));
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw tokens, ignoring everything else
/// (positional arguments, `--save`, unknown options).
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--no-sync" => flags.no_sync = true,
            "--no-restore" => flags.no_restore = true,
            "--no-watch" => flags.no_watch = true,
            "--preview" | "--theme" | "--sync-delay" | "--template" | "--css" | "--log-file" => {
                let value = match inline {
                    Some(value) => Some(value),
                    None => {
                        let next = tokens.get(i + 1).map(String::as_str);
                        if next.is_some() {
                            i += 1;
                        }
                        next
                    }
                };
                if let Some(value) = value {
                    apply_valued_flag(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--preview" => flags.preview = PreviewMode::from_name(value),
        "--theme" => flags.theme = ThemeMode::from_name(value),
        "--sync-delay" => flags.sync_delay_ms = value.parse().ok(),
        "--template" => flags.template = Some(PathBuf::from(value)),
        "--css" => flags.css = Some(PathBuf::from(value)),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}
