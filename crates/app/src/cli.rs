use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracker_core::model::Subject;

/// NEET study progress tracker.
#[derive(Debug, Parser)]
#[command(name = "tracker", version, about = "NEET study progress tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port to listen on (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create or migrate the database and bootstrap the admin account
    InitDb {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Run Pomodoro focus intervals in the terminal
    Focus {
        #[command(flatten)]
        source: SourceArgs,

        /// Username the completed intervals are credited to
        #[arg(long)]
        user: String,

        /// Subject studied during the intervals
        #[arg(long)]
        subject: Option<Subject>,

        /// Work intervals to complete before exiting
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
}

/// Where configuration and data come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Config file (defaults to ./tracker.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database URL or path (overrides configuration)
    #[arg(long, value_name = "URL")]
    pub db: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn focus_parses_subject_and_cycles() {
        let cli = Cli::try_parse_from([
            "tracker", "focus", "--user", "asha", "--subject", "Biology", "--cycles", "3",
        ])
        .expect("cli should parse");

        match cli.command {
            Commands::Focus {
                user,
                subject,
                cycles,
                ..
            } => {
                assert_eq!(user, "asha");
                assert_eq!(subject, Some(Subject::Biology));
                assert_eq!(cycles, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_subjects_are_rejected() {
        let err = Cli::try_parse_from(["tracker", "focus", "--user", "asha", "--subject", "Maths"]);
        assert!(err.is_err());
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["tracker", "serve", "--db", "data/dev.db", "--port", "8080"])
            .expect("cli should parse");
        match cli.command {
            Commands::Serve { source, port } => {
                assert_eq!(source.db.as_deref(), Some("data/dev.db"));
                assert_eq!(port, Some(8080));
                assert!(source.config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
