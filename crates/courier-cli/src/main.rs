//! Courier CLI - capture event records and forward them to a collector.

use clap::Parser;
use courier_capture::CaptureService;
use courier_cli::commands;
use courier_cli::{config, Cli, Command, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> courier_cli::Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    courier_cli::init_tracing(&config.logging.level);
    tracing::debug!(store = %config.store.dir.display(), "Configuration loaded");

    let service = CaptureService::from_config(&config)?;
    let formatter = Formatter::new(!cli.no_color);

    let result = match cli.command {
        Command::Capture(args) => commands::execute_capture(args, &service, &formatter),
        Command::List(args) => commands::execute_list(args, &service, &formatter),
        Command::Clear(args) => commands::execute_clear(args, &service, &formatter),
    };

    // Let enrichment and delivery finish before the process exits
    if !service.shutdown().await {
        eprintln!("{}", formatter.warning("Records could not be saved"));
    }

    result
}
