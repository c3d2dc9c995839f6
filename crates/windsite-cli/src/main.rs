use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use windsite_cli::cli::{Cli, Commands};

mod commands;

use commands::optimize::OptimizeArgs;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Optimize {
            site,
            out,
            field_csv,
            turbines,
            backend,
            time_limit,
            no_evaluate,
            threads,
        } => commands::optimize::handle(&OptimizeArgs {
            site,
            out: out.as_ref(),
            field_csv: field_csv.as_ref(),
            turbines: *turbines,
            backend: *backend,
            time_limit: *time_limit,
            no_evaluate: *no_evaluate,
            threads,
        }),
        Commands::Field { site, out, threads } => commands::field::handle(site, out, threads),
        Commands::Validate { site } => {
            info!("Validating site file {}", site.display());
            commands::validate::handle(site)
        }
        Commands::Completions { shell, out } => {
            commands::completions::handle(*shell, out.as_deref())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
