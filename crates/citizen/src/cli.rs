use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fixmyroad_core::report::ReportStatus;

#[derive(Debug, Parser)]
#[command(name = "fixmyroad", version, about = "Report road issues and track their repair")]
pub struct Cli {
    /// Profile directory holding the local report store.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Classify through the backend proxy instead of the offline demo.
    #[arg(long, global = true, conflicts_with = "demo")]
    pub live: bool,

    /// Force the offline demo classifier.
    #[arg(long, global = true)]
    pub demo: bool,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new report for AI classification
    Submit {
        #[arg(long)]
        location: String,
        #[arg(long)]
        description: String,
        /// Issue category (defaults to "General")
        #[arg(long)]
        category: Option<String>,
        /// Photo of the issue (PNG, JPEG or WebP)
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// List stored reports, newest first, or show one in detail
    Reports {
        /// Report id, e.g. "#2401"
        #[arg(long)]
        id: Option<String>,
    },

    /// Show aggregate statistics
    Stats {
        /// Recompute from the full collection instead of the cached snapshot
        #[arg(long)]
        refresh: bool,
    },

    /// Admin overview: statistics plus the ten most recent reports
    Dashboard {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Move a report to a new status and append progress stages
    UpdateStatus {
        id: String,
        /// pending, in_progress or resolved
        status: ReportStatus,
        /// Extra stage labels to append, in order
        #[arg(long = "stage")]
        stages: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_with_global_flags_anywhere() {
        let cli = Cli::try_parse_from([
            "fixmyroad",
            "submit",
            "--location",
            "MG Road",
            "--description",
            "Pothole",
            "--live",
            "--data-dir",
            "/tmp/profile",
        ])
        .unwrap();

        assert!(cli.live);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/profile")));
        assert_matches!(cli.cmd, Command::Submit { ref location, photo: None, .. } if location == "MG Road");
    }

    #[test]
    fn update_status_accepts_legacy_progress_spelling() {
        let cli =
            Cli::try_parse_from(["fixmyroad", "update-status", "#2401", "progress", "--stage", "Crew assigned"])
                .unwrap();
        assert_matches!(
            cli.cmd,
            Command::UpdateStatus { status: ReportStatus::InProgress, ref stages, .. } if stages == &["Crew assigned"]
        );
    }

    #[test]
    fn live_and_demo_conflict() {
        assert!(Cli::try_parse_from(["fixmyroad", "--live", "--demo", "stats"]).is_err());
    }
}
