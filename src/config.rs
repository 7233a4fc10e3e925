//! Command line and runtime configuration.
//!
//! [`Cli`] is what clap parses; [`InspectorConfig`] is what the rest of the
//! crate reads. Every option has a default, so the viewer runs without
//! arguments and shows the first bundled example.

use std::path::PathBuf;

use clap::Parser;

use crate::state::animate::DEFAULT_FRAMES;
use crate::theme::ColorScheme;

/// Columns moved per horizontal scroll step.
pub const DEFAULT_SCROLL_STEP: u16 = 8;

/// File name of the document store inside the data directory.
pub const STORE_FILE: &str = "store.json";

/// Interactive viewer for nested composition documents.
#[derive(Debug, Parser)]
#[command(name = "composition-inspector", version, about)]
pub struct Cli {
    /// File path, http(s) URL, storage key, or examples/<name>
    pub source: Option<String>,

    /// Print the bundled example keys and exit
    #[arg(long)]
    pub list_examples: bool,

    /// Use the dark palette
    #[arg(long)]
    pub dark: bool,

    /// Axis units per terminal column (default: ticks_per_beat / 48)
    #[arg(long, value_name = "UNITS")]
    pub units_per_column: Option<f64>,

    /// Document store file
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Write logs to this file (logging is off without it)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `composition_inspector=trace`
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Columns per horizontal scroll step
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_SCROLL_STEP)]
    pub scroll_step: u16,

    /// Frames per animated skip
    #[arg(long, value_name = "FRAMES", default_value_t = DEFAULT_FRAMES)]
    pub animation_frames: u32,
}

/// Resolved viewer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorConfig {
    pub source: Option<String>,
    pub scheme: ColorScheme,
    /// Fixed zoom. `None` derives it from each document.
    pub units_per_column: Option<f64>,
    pub store_path: PathBuf,
    pub scroll_step: u16,
    pub animation_frames: u32,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            source: None,
            scheme: ColorScheme::Light,
            units_per_column: None,
            store_path: default_store_path(),
            scroll_step: DEFAULT_SCROLL_STEP,
            animation_frames: DEFAULT_FRAMES,
        }
    }
}

impl From<&Cli> for InspectorConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            source: cli.source.clone(),
            scheme: if cli.dark {
                ColorScheme::Dark
            } else {
                ColorScheme::Light
            },
            units_per_column: cli.units_per_column.filter(|u| u.is_finite() && *u > 0.0),
            store_path: cli.store.clone().unwrap_or_else(default_store_path),
            scroll_step: cli.scroll_step.max(1),
            animation_frames: cli.animation_frames.max(1),
        }
    }
}

impl InspectorConfig {
    /// Zoom for a document with the given `ticks_per_beat`.
    ///
    /// A beat is 48 columns wide by default; never less than one unit per
    /// column.
    pub fn units_per_column_for(&self, ticks_per_beat: i64) -> f64 {
        self.units_per_column
            .unwrap_or_else(|| (ticks_per_beat as f64 / 48.0).max(1.0))
    }
}

/// `$XDG_DATA_HOME/composition-inspector/store.json`, falling back to
/// `~/.local/share` and then the working directory.
pub fn default_store_path() -> PathBuf {
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share"))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("composition-inspector").join(STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("composition-inspector").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        let config = InspectorConfig::from(&cli);
        assert_eq!(config.source, None);
        assert_eq!(config.scheme, ColorScheme::Light);
        assert_eq!(config.scroll_step, DEFAULT_SCROLL_STEP);
        assert_eq!(config.animation_frames, DEFAULT_FRAMES);
        assert!(config.store_path.ends_with(STORE_FILE));
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "examples/deep",
            "--dark",
            "--units-per-column",
            "4",
            "--store",
            "/tmp/s.json",
        ]);
        let config = InspectorConfig::from(&cli);
        assert_eq!(config.source.as_deref(), Some("examples/deep"));
        assert_eq!(config.scheme, ColorScheme::Dark);
        assert_eq!(config.units_per_column, Some(4.0));
        assert_eq!(config.store_path, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_units_per_column() {
        let config = InspectorConfig::default();
        assert_eq!(config.units_per_column_for(480), 10.0);
        assert_eq!(config.units_per_column_for(24), 1.0);

        let fixed = InspectorConfig {
            units_per_column: Some(3.0),
            ..InspectorConfig::default()
        };
        assert_eq!(fixed.units_per_column_for(480), 3.0);
    }

    #[test]
    fn test_invalid_zoom_is_ignored() {
        let config = InspectorConfig::from(&parse(&["--units-per-column", "0"]));
        assert_eq!(config.units_per_column, None);
    }
}
