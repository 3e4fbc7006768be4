//! Library side of the `clinwire` binary: configuration, logging setup and
//! the command implementations.

pub mod config;

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use clinwire_fhir::{ContainedResource, DecodeContext, ResourceRegistry};
use clinwire_serde::{resource_from_json_str_with, to_json_writer};
use tracing::{debug, info};

pub use config::{CliConfig, Command};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clinwire={level},clinwire_cli={level},clinwire_fhir={level},clinwire_serde={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Summary printed by `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub resource_type: &'static str,
    pub id: Option<String>,
    /// Directly contained resources, by type.
    pub contained: Vec<&'static str>,
}

impl CheckReport {
    pub fn of(resource: &ContainedResource) -> Self {
        Self {
            resource_type: resource.resource_type(),
            id: resource.id().map(str::to_string),
            contained: resource
                .contained()
                .iter()
                .map(ContainedResource::resource_type)
                .collect(),
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id={} contained={}",
            self.resource_type,
            self.id.as_deref().unwrap_or("-"),
            self.contained.len()
        )?;
        if !self.contained.is_empty() {
            write!(f, " [{}]", self.contained.join(", "))?;
        }
        Ok(())
    }
}

/// Reads the input document from `path`, or stdin for `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Decodes `text` polymorphically with the process-wide registry.
pub fn decode(text: &str, config: &CliConfig) -> anyhow::Result<ContainedResource> {
    let cx = DecodeContext::new(ResourceRegistry::global(), config.decode_options());
    let resource = resource_from_json_str_with(text, &cx)?;
    debug!(resource_type = resource.resource_type(), "decoded resource");
    Ok(resource)
}

/// Runs the selected command against already-read input, writing to `out`.
pub fn run_with_input<W: Write>(config: &CliConfig, text: &str, mut out: W) -> anyhow::Result<()> {
    let resource = decode(text, config)?;
    match &config.command {
        Command::Check { .. } => {
            let report = CheckReport::of(&resource);
            info!(resource_type = report.resource_type, "check passed");
            writeln!(out, "{report}")?;
        }
        Command::Roundtrip { pretty, .. } => {
            to_json_writer(&mut out, &resource, *pretty)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn run<W: Write>(config: &CliConfig, out: W) -> anyhow::Result<()> {
    let input = config.input();
    let text = read_input(input)?;
    run_with_input(config, &text, out).with_context(|| format!("{}", input.display()))
}
