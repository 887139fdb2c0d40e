//! listmind - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// listmind - gesture-driven lists in the terminal
#[derive(Parser, Debug)]
#[command(name = "listmind")]
#[command(version)]
#[command(about = "Swipe, long-press and drag-reorder list items, or replay pointer traces")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Replay a JSONL pointer trace and print the effects as JSON lines
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Swipe distance in px that commits a complete or delete
    #[arg(long, value_name = "PX")]
    pub swipe_threshold: Option<f32>,

    /// Hold time in ms before a long press fires
    #[arg(long, value_name = "MS")]
    pub long_press_ms: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = listmind::config::load_config_with_precedence(args.config.clone())?;
        let merged = listmind::config::merge_config(config_file);
        let with_env = listmind::config::apply_env_overrides(merged)?;
        listmind::config::apply_cli_overrides(with_env, args.swipe_threshold, args.long_press_ms)
    };
    config.validate()?;

    listmind::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let gesture = config.gesture_config();

    if let Some(trace) = &args.trace {
        let stdout = std::io::stdout();
        let summary = listmind::trace::replay_file(trace, gesture, stdout.lock())?;
        eprintln!(
            "replayed {} records, {} effects",
            summary.records, summary.effects
        );
        return Ok(());
    }

    let colors = listmind::view::ColorConfig::from_env_and_args(args.no_color);
    listmind::view::run(gesture, colors)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        // Help returns Err with DisplayHelp, which is success
        let result = Args::try_parse_from(["listmind", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["listmind", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["listmind"]);
        assert_eq!(args.config, None);
        assert_eq!(args.trace, None);
        assert_eq!(args.swipe_threshold, None);
        assert_eq!(args.long_press_ms, None);
        assert!(!args.no_color);
    }

    #[test]
    fn test_trace_path() {
        let args = Args::parse_from(["listmind", "--trace", "drag.jsonl"]);
        assert_eq!(args.trace, Some(PathBuf::from("drag.jsonl")));
    }

    #[test]
    fn test_gesture_overrides() {
        let args = Args::parse_from([
            "listmind",
            "--swipe-threshold",
            "96.5",
            "--long-press-ms",
            "650",
        ]);
        assert_eq!(args.swipe_threshold, Some(96.5));
        assert_eq!(args.long_press_ms, Some(650));
    }

    #[test]
    fn test_long_press_rejects_negative() {
        let result = Args::try_parse_from(["listmind", "--long-press-ms", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_swipe_threshold_rejects_text() {
        let result = Args::try_parse_from(["listmind", "--swipe-threshold", "far"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["listmind", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_overrides_flow_into_gesture_config() {
        use listmind::config::{apply_cli_overrides, merge_config, ConfigFile};
        use std::time::Duration;

        let config_file = ConfigFile {
            swipe_threshold: Some(90.0),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.swipe_threshold, 90.0);

        let args = Args::parse_from(["listmind", "--long-press-ms", "700"]);
        let resolved = apply_cli_overrides(merged, args.swipe_threshold, args.long_press_ms);
        let gesture = resolved.gesture_config();

        assert_eq!(gesture.swipe.threshold, 90.0, "file value kept without a flag");
        assert_eq!(gesture.long_press.delay, Duration::from_millis(700));
    }
}
