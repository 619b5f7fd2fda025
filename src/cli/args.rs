//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// fast-cosine - score binary doc-value vectors against a query vector
#[derive(Parser, Debug, Clone)]
#[command(name = "fast-cosine")]
#[command(about = "Encode, decode and score binary doc-value vectors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FastCosineArgs {
    /// Verbosity level (repeat for more: -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FastCosineArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet { 0 } else { self.verbose + 1 }
    }

    /// Default log directive for the effective verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Encode a vector into the binary doc-value layout (base64)
    Encode(EncodeArgs),

    /// Decode a base64 encoded vector
    Decode(DecodeArgs),

    /// Score documents from a JSONL file against a query
    Score(ScoreArgs),
}

/// Arguments for encoding a vector
#[derive(Parser, Debug, Clone)]
pub struct EncodeArgs {
    /// Comma separated components, e.g. "0.1,0.2,0.3"
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    pub vector: Vec<f64>,
}

/// Arguments for decoding a vector
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// Base64 encoded vector frame
    #[arg(value_name = "BASE64")]
    pub encoded: String,
}

/// Arguments for scoring documents
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Script parameters file (JSON object)
    #[arg(short, long, value_name = "PARAMS_FILE")]
    pub params: PathBuf,

    /// Documents file (JSONL, one {"id", "vector" | "encoded"} object per line)
    #[arg(short, long, value_name = "DOCS_FILE")]
    pub docs: PathBuf,

    /// Script identifier
    #[arg(long, default_value = crate::engine::VECTOR_SCORE_SCRIPT)]
    pub script: String,

    /// Only print the best N documents, ordered by the metric
    #[arg(short, long)]
    pub top: Option<usize>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
