use std::{
    io::{self, BufWriter},
    path::PathBuf,
    process,
};

use clap::Parser;
use enrich_connectors_native_mysql::MysqlLookupFilter;
use enrich_core::err::Result;
use enrich_logging::{error, info};

pub mod args;
pub mod conf;
pub mod pipeline;

use args::Command;
use conf::*;
use pipeline::Pipeline;

/// Entrypoint of the enrich binary.
/// Events are written to stdout so everything else goes to stderr.
fn main() {
    if let Err(err) = enrich_logging::init_logging() {
        eprintln!("Failed to initialise logging: {:#}", err);
    }

    let command = Command::parse();

    if let Err(err) = run(command) {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let config_path = command
        .args()
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_conf(&config_path)?;

    let mut filter: MysqlLookupFilter = MysqlLookupFilter::new(config);
    filter.register()?;

    match command {
        Command::Check(_) => {
            info!(
                "Configuration is valid and {} is reachable",
                filter.connection_descriptor().uri
            );
        }
        Command::Run(_) => {
            info!("Reading events from stdin...");
            let stdin = io::stdin();
            let stdout = io::stdout();

            Pipeline::new(filter).run(stdin.lock(), BufWriter::new(stdout.lock()))?;
        }
    }

    Ok(())
}
