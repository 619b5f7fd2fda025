//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{FastCosineArgs, OutputFormat};
use crate::error::Result;
use crate::parallel::ScoredDoc;

/// Result of encoding a vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeResult {
    pub dimension: usize,
    pub bytes: usize,
    pub encoded: String,
}

/// Result of decoding a vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeResult {
    pub dimension: usize,
    pub vector: Vec<f64>,
}

/// Result of scoring a documents file.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResults {
    pub field: String,
    pub metric: String,
    pub dimension: usize,
    pub documents: usize,
    pub duration_ms: u64,
    pub hits: Vec<ScoredDoc>,
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &FastCosineArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &FastCosineArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for EncodeResult {
    fn print_human(&self) {
        println!("{}", self.encoded);
    }
}

impl HumanOutput for DecodeResult {
    fn print_human(&self) {
        let components: Vec<String> = self.vector.iter().map(|v| v.to_string()).collect();
        println!("[{}]", components.join(", "));
    }
}

impl HumanOutput for ScoreResults {
    fn print_human(&self) {
        println!(
            "{} documents scored on [{}] with {} (dimension {}) in {}ms",
            self.documents, self.field, self.metric, self.dimension, self.duration_ms
        );
        println!("{:>10}  {:>20}", "doc", "score");
        for hit in &self.hits {
            println!("{:>10}  {:>20.10}", hit.doc_id, hit.score);
        }
    }
}
