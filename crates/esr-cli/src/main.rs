use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Convert {
            input,
            output,
            config,
            start_year,
            end_year,
            csv,
            cbc: _,
        } => commands::convert::handle(input, output, config, *start_year, *end_year, *csv),
        Commands::Results {
            input,
            output,
            config,
            format,
            input_data,
            strict,
        } => commands::results::handle(
            input,
            output,
            config,
            *format,
            input_data.as_deref(),
            *strict,
        ),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
