//! mdlive - A terminal Markdown editor with a live preview.
//!
//! # Usage
//!
//! ```bash
//! mdlive
//! mdlive notes.md
//! mdlive --preview html --css page.css notes.md
//! mdlive notes.md --export notes.html
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdlive::app::App;
use mdlive::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags, store_path,
};
use mdlive::document::PreviewMode;
use mdlive::html;
use mdlive::scroll::DEFAULT_SYNC_DEBOUNCE_MS;
use mdlive::store::FileStore;
use mdlive::ui::style::set_theme_mode;

/// A terminal Markdown editor with a live preview
#[derive(Parser, Debug)]
#[command(name = "mdlive", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (restores the last session when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Markdown file used as the starting document and reset target
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Stylesheet embedded into exported HTML
    #[arg(long, value_name = "PATH")]
    css: Option<PathBuf>,

    /// Initial preview mode
    #[arg(long, value_enum)]
    preview: Option<PreviewMode>,

    /// Force the color theme (light or dark)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Milliseconds a synced scroll holds off the other pane
    #[arg(long, value_name = "MS")]
    sync_delay: Option<u64>,

    /// Disable scroll sync between the panes
    #[arg(long)]
    no_sync: bool,

    /// Start from the template instead of the last session
    #[arg(long)]
    no_restore: bool,

    /// Do not watch FILE for external changes
    #[arg(long)]
    no_watch: bool,

    /// Write FILE as a standalone HTML page to PATH and exit
    #[arg(long, value_name = "PATH", requires = "file")]
    export: Option<PathBuf>,

    /// Write logs to a file (the TUI owns the terminal)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Send logs to `log_file` when given. Otherwise only a headless export logs,
/// to stderr, since an interactive session owns the terminal.
fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn export(source: &Path, dest: &Path, css_path: Option<&Path>) -> Result<()> {
    let markdown = fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let css = match css_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet {}", path.display()))?,
        None => html::DEFAULT_CSS.to_string(),
    };
    let title = source
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
    let page = html::standalone_document(&html::markdown_to_html(&markdown), &title, &css);
    fs::write(dest, page).with_context(|| format!("Failed to write {}", dest.display()))?;
    tracing::info!(source = %source.display(), dest = %dest.display(), "exported html");
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_file = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("MDLIVE_LOG").map(PathBuf::from));
    init_logging(log_file.as_deref(), cli.export.is_some())?;

    if let (Some(dest), Some(source)) = (cli.export.as_deref(), cli.file.as_deref()) {
        return export(source, dest, effective.css.as_deref());
    }

    set_theme_mode(effective.theme.unwrap_or(ThemeMode::Auto));

    let mut app = App::new()
        .with_file(cli.file)
        .with_template(effective.template)
        .with_css(effective.css)
        .with_preview_mode(effective.preview.unwrap_or_default())
        .with_sync(
            !effective.no_sync,
            effective.sync_delay_ms.unwrap_or(DEFAULT_SYNC_DEBOUNCE_MS),
        )
        .with_restore(!effective.no_restore)
        .with_watch(!effective.no_watch);

    match FileStore::open(store_path()) {
        Ok(store) => app = app.with_store(Box::new(store)),
        Err(err) => {
            tracing::warn!(%err, "last-state store unavailable");
            eprintln!("[warn] Session restore disabled: {err}");
        }
    }

    app.run().context("Application error")
}
