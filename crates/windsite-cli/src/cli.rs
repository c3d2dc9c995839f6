use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;
use windsite_core::MipBackendKind;

#[derive(Parser, Debug)]
#[command(name = "windsite", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the wake field, price candidates and solve the turbine layout
    Optimize {
        /// Site definition file (TOML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        site: PathBuf,
        /// Write the full result as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Also write the all-candidate wake field as CSV (x,y,speed)
        #[arg(long, value_hint = ValueHint::FilePath)]
        field_csv: Option<PathBuf>,
        /// Override the number of turbines to place
        #[arg(long)]
        turbines: Option<usize>,
        /// Override the MIP backend
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
        /// Override the solver time limit (seconds)
        #[arg(long)]
        time_limit: Option<f64>,
        /// Skip re-evaluating the chosen layout with only its own wakes
        #[arg(long)]
        no_evaluate: bool,
        /// Threading: 'auto' or a number
        #[arg(long, default_value = "auto")]
        threads: String,
    },
    /// Write the expected wake field of a site as CSV (x,y,speed)
    Field {
        /// Site definition file (TOML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        site: PathBuf,
        /// Output CSV path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Threading: 'auto' or a number
        #[arg(long, default_value = "auto")]
        threads: String,
    },
    /// Check a site definition and report every issue found
    Validate {
        /// Site definition file (TOML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        site: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Microlp,
    Highs,
}

impl From<BackendArg> for MipBackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Microlp => MipBackendKind::Microlp,
            BackendArg::Highs => MipBackendKind::Highs,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
