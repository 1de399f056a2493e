use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use dsm_cli::{load_config, Cli, Commands};

mod commands;

use commands::plot::PlotArgs;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Extract { results, out } => {
            info!("Extracting results from {}", results.display());
            commands::extract::handle(results, out.as_deref(), &config)
        }
        Commands::Plot {
            results,
            directory,
            project,
            days,
            save,
        } => {
            info!("Plotting {} in {}-day windows", results.display(), days);
            let args = PlotArgs {
                results,
                directory,
                project,
                days: *days,
                save: *save,
            };
            commands::plot::handle(&args, &config)
        }
        Commands::Mkdir { name } => commands::mkdir::handle(name),
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {err}");
    }

    if let Err(err) = run(&cli) {
        error!("{err:?}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
