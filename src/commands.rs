//! CLI command definitions
//!
//! Defines the clap commands for the apichain CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario: every API in dependency order, once per test case
    Run {
        /// Scenario name (key in the test case file)
        scenario: String,
    },

    /// Show the concrete request an API would send, without sending it
    Resolve {
        /// Scenario name
        scenario: String,

        /// API to resolve
        api: String,

        /// Test case number to use for input values (1-based)
        #[arg(long, short, default_value = "1")]
        iteration: usize,
    },

    /// Interaction graph management
    #[command(subcommand)]
    Graph(GraphCommands),

    /// Summarize the stored results of a scenario
    Report {
        /// Scenario name
        scenario: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Build a scenario's interaction file from a list of links
    Build {
        /// Scenario name
        scenario: String,

        /// JSON file: {"apis": [...], "links": [{"input", "output", "level", "H", "P", "B"}]}
        #[arg(long)]
        links: PathBuf,
    },

    /// Print the waves and injected parameters of a scenario
    Show {
        /// Scenario name
        scenario: String,
    },
}
