//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a round's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted transcript with a header
    Full,
    /// JSON output
    Json,
    /// Plain transcript lines, one attribution per persona
    Text,
}

/// CLI arguments for summit
#[derive(Parser, Debug)]
#[command(name = "summit")]
#[command(author, version, about = "The Summit - a panel of personas deliberates on your message")]
#[command(long_about = r#"
The Summit poses one message to a panel of personas. They answer strictly in
the order given, sharing one backend session, so each persona sees what the
previous ones said.

Without --stream the round runs to completion and the transcript is printed.
With --stream the round runs in the background: an acknowledgment with the
topic name is printed first, then tokens appear live as events arrive on that
topic. Ctrl-C cancels a streaming round.

Configuration files are loaded from (in priority order):
1. SUMMIT_* environment variables (e.g. SUMMIT_AGENT__BASE_URL)
2. --config <path>     Explicit config file
3. ./summit.toml       Project-level config
4. ~/.config/summit/config.toml   Global config

Example:
  summit -p gandalf -p terminator -p ships_cat "Should we migrate to microservices?"
  summit --stream -s my-session -p gandalf -p terminator "Tabs or spaces?"
"#)]
pub struct Cli {
    /// The message to put to the panel
    #[arg(required_unless_present = "show_config")]
    pub message: Option<String>,

    /// Personas in speaking order (can be specified multiple times)
    #[arg(short, long = "persona", value_name = "PERSONA", required_unless_present = "show_config")]
    pub personas: Vec<String>,

    /// Backend session id shared by all personas of the round
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Run the round in the background and stream events
    #[arg(long)]
    pub stream: bool,

    /// Topic to publish streaming events to (derived from the session by default)
    #[arg(long, value_name = "TOPIC", requires = "stream")]
    pub topic: Option<String>,

    /// Cancel a streaming round after this many milliseconds
    #[arg(long, value_name = "MS", requires = "stream")]
    pub cancel_after_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_personas_in_order() {
        let cli = Cli::try_parse_from([
            "summit", "-p", "gandalf", "--persona", "terminator", "-p", "ships_cat", "Hello",
        ])
        .unwrap();
        assert_eq!(cli.message.as_deref(), Some("Hello"));
        assert_eq!(cli.personas, vec!["gandalf", "terminator", "ships_cat"]);
        assert!(!cli.stream);
        assert_eq!(cli.output, OutputFormat::Full);
    }

    #[test]
    fn test_requires_persona() {
        assert!(Cli::try_parse_from(["summit", "Hello"]).is_err());
    }

    #[test]
    fn test_show_config_needs_nothing_else() {
        let cli = Cli::try_parse_from(["summit", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.message.is_none());
    }

    #[test]
    fn test_topic_requires_stream() {
        assert!(Cli::try_parse_from(["summit", "-p", "a", "--topic", "t", "Hi"]).is_err());

        let cli = Cli::try_parse_from([
            "summit", "-p", "a", "--stream", "--topic", "room/1", "--cancel-after-ms", "500", "Hi",
        ])
        .unwrap();
        assert_eq!(cli.topic.as_deref(), Some("room/1"));
        assert_eq!(cli.cancel_after_ms, Some(500));
    }
}
