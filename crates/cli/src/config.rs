//! Command line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CLINWIRE_LOG_LEVEL` | warn | Log level |
//! | `CLINWIRE_EMPTY_CHOICE` | absent | `absent` or `reject` for choice keys carrying nothing |
//! | `CLINWIRE_PRETTY` | false | Pretty-print `roundtrip` output |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clinwire_serde_support::{DecodeOptions, EmptyChoicePolicy};

#[derive(Debug, Clone, Parser)]
#[command(name = "clinwire")]
#[command(about = "Decode, check and re-encode FHIR JSON resources")]
#[command(version)]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "CLINWIRE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// How a choice key that carries nothing is treated (absent, reject).
    #[arg(long, global = true, env = "CLINWIRE_EMPTY_CHOICE", default_value = "absent")]
    pub empty_choice: EmptyChoicePolicy,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Decode a resource and report its type, id and contained resources.
    Check {
        /// Input file, or `-` for stdin.
        file: PathBuf,
    },
    /// Decode a resource and print it re-encoded.
    Roundtrip {
        /// Input file, or `-` for stdin.
        file: PathBuf,

        /// Pretty-print the output.
        #[arg(long, env = "CLINWIRE_PRETTY")]
        pretty: bool,
    },
}

impl CliConfig {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::new().with_empty_choice(self.empty_choice)
    }

    /// The input path of the selected command.
    pub fn input(&self) -> &PathBuf {
        match &self.command {
            Command::Check { file } | Command::Roundtrip { file, .. } => file,
        }
    }
}
