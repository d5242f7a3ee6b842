// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track one-rep maxes and plan 5/3/1 training weights", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print list/plan output as CSV instead of a table
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start tracking a lift
    Add {
        /// Name of the lift (e.g., "Squat", "Bench Press")
        name: String,
        /// One-rep max, in the configured unit
        weight: String,
    },
    /// List tracked lifts
    List,
    /// Overwrite a lift's max weight
    Edit {
        /// ID of the lift
        id: i64,
        /// New one-rep max, in the configured unit
        weight: String,
    },
    /// Step a lift's max weight up (or down with --down)
    Bump {
        /// ID of the lift
        id: i64,
        /// Use the large step (10 lbs / 5 kg) instead of the small one (5 lbs / 2.5 kg)
        #[arg(long)]
        large: bool,
        /// Step down instead of up
        #[arg(long)]
        down: bool,
    },
    /// Stop tracking a lift
    Delete {
        /// ID of the lift to delete
        id: i64,
    },
    /// Show warm-up and working sets for a lift
    Plan {
        /// ID of the lift
        id: i64,
        /// Deload, 5/5/5, 3/3/3 or 5/3/1 (defaults to the configured cycle)
        #[arg(short, long)]
        cycle: Option<String>,
    },
    /// List the available training cycles and their percentages
    Cycles,
    /// Set the display unit
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set the cycle used by `plan` when --cycle is not given
    SetCycle { cycle: String },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Print a shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
