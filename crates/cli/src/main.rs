//! clinwire: check and re-encode FHIR JSON resources.

use std::io;

use clap::Parser;
use clinwire_cli::{CliConfig, init_logging, run};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    run(&config, io::stdout().lock())
}
