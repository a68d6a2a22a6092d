use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::Tier;

#[derive(Parser, Debug)]
#[command(author, version, about = "tournament progression engine: fixtures, standings, promotion and knockout brackets")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP service
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    Init {
        /// Drop all existing tables first
        #[arg(long)]
        reset: bool,
    },
    /// Generate a round-robin schedule for a roster file (JSON list of teams)
    Fixture {
        roster: PathBuf,
        /// How many times each pair of teams meets
        #[arg(short = 'n', long, default_value_t = 1)]
        times_met: u32,
        /// Write the rounds as JSON instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the current table of a stored group
    Standings { group: String },
    /// Resolve promotion for the groups of one phase
    Promote {
        #[arg(required = true)]
        groups: Vec<String>,
        /// Seed a bracket for every tier that received teams
        #[arg(long)]
        seed: bool,
    },
    /// Print a stored bracket
    Bracket { tier: Tier },
    /// Print shell completions
    Completions { shell: Shell },
}
