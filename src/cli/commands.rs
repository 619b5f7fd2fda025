//! Command implementations for the fast-cosine CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::codec;
use crate::doc_values::{DocId, MemorySegment};
use crate::engine::{FastCosineEngine, ScriptContext};
use crate::factory::metric_name;
use crate::parallel::{SegmentTask, score_segments, sort_best_first};
use crate::params::ScoringParams;

/// Execute a CLI command.
pub fn execute_command(args: FastCosineArgs) -> anyhow::Result<()> {
    match &args.command {
        Command::Encode(encode_args) => encode_vector(encode_args, &args),
        Command::Decode(decode_args) => decode_vector(decode_args, &args),
        Command::Score(score_args) => score_documents(score_args, &args),
    }
}

fn encode_vector(args: &EncodeArgs, cli_args: &FastCosineArgs) -> anyhow::Result<()> {
    if args.vector.is_empty() {
        bail!("--vector needs at least one component");
    }

    let frame = codec::encode(&args.vector)?;
    let result = EncodeResult {
        dimension: args.vector.len(),
        bytes: frame.len(),
        encoded: STANDARD.encode(&frame),
    };

    output_result("Encoded vector", &result, cli_args)?;
    Ok(())
}

fn decode_vector(args: &DecodeArgs, cli_args: &FastCosineArgs) -> anyhow::Result<()> {
    let frame = STANDARD
        .decode(args.encoded.trim())
        .context("input is not valid base64")?;
    let vector = codec::decode_frame(&frame).context("input is not a valid encoded vector")?;

    let result = DecodeResult {
        dimension: vector.len(),
        vector,
    };

    output_result("Decoded vector", &result, cli_args)?;
    Ok(())
}

/// One line of a documents file.
#[derive(Debug, Deserialize)]
struct DocumentLine {
    id: DocId,
    #[serde(default)]
    vector: Option<Vec<f64>>,
    #[serde(default)]
    encoded: Option<String>,
}

/// Load a JSONL documents file into a single in-memory segment.
///
/// Returns the segment and the document ids in ascending order.
pub fn load_documents(path: &Path, field: &str) -> anyhow::Result<(MemorySegment, Vec<DocId>)> {
    let file = File::open(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    let mut segment = MemorySegment::new(0);
    let mut ids = Vec::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let location = || format!("{}:{}", path.display(), line_no + 1);
        let doc: DocumentLine = serde_json::from_str(&line)
            .with_context(|| format!("{}: invalid document", location()))?;

        let added = match (doc.vector, doc.encoded) {
            (Some(vector), _) => segment.add_vector(doc.id, field, &vector),
            (None, Some(encoded)) => {
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .with_context(|| format!("{}: bad base64", location()))?;
                segment.add_value(doc.id, field, bytes)
            }
            (None, None) => segment.add_empty(doc.id),
        };
        added.with_context(location)?;
        ids.push(doc.id);
    }

    ids.sort_unstable();
    ids.dedup();
    Ok((segment, ids))
}

/// Read and validate a script parameters file.
pub fn load_params(path: &Path) -> anyhow::Result<ScoringParams> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{}: invalid JSON", path.display()))?;

    ScoringParams::from_value(&value).with_context(|| path.display().to_string())
}

fn score_documents(args: &ScoreArgs, cli_args: &FastCosineArgs) -> anyhow::Result<()> {
    let params = load_params(&args.params)?;
    let factory = FastCosineEngine::new()
        .compile_params(&args.script, ScriptContext::Score, params)?;
    let (segment, ids) = load_documents(&args.docs, factory.field())?;
    info!(documents = ids.len(), "loaded documents");

    let start = Instant::now();
    let tasks = [SegmentTask::new(&segment, ids)];
    let mut hits: Vec<_> = score_segments(&factory, &tasks)
        .into_iter()
        .flat_map(|scores| scores.docs)
        .collect();
    let duration_ms = start.elapsed().as_millis() as u64;
    let documents = hits.len();

    if let Some(top) = args.top {
        // Without a metric every score is 0, input order is kept.
        if let Some(metric) = factory.metric() {
            sort_best_first(&mut hits, metric);
        }
        hits.truncate(top);
    }

    let result = ScoreResults {
        field: factory.field().to_string(),
        metric: metric_name(factory.metric()).to_string(),
        dimension: factory.query().dimension(),
        documents,
        duration_ms,
        hits,
    };

    output_result("Scored documents", &result, cli_args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_values::SegmentReader;
    use base64::Engine as _;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_documents() {
        let encoded = STANDARD.encode(codec::encode(&[0.0, 1.0]).unwrap());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 3, "vector": [1.0, 2.0]}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": 0, "encoded": "{encoded}"}}"#).unwrap();
        writeln!(file, r#"{{"id": 5}}"#).unwrap();
        file.flush().unwrap();

        let (segment, ids) = load_documents(file.path(), "embedding").unwrap();

        assert_eq!(ids, vec![0, 3, 5]);
        assert_eq!(segment.max_doc(), 6);

        let values = segment.field("embedding").unwrap();
        assert_eq!(codec::decode_frame(values.get(3).unwrap()).unwrap(), vec![1.0, 2.0]);
        assert_eq!(codec::decode_frame(values.get(0).unwrap()).unwrap(), vec![0.0, 1.0]);
        assert!(values.get(5).is_none());
    }

    #[test]
    fn test_load_documents_reports_bad_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "x"}}"#).unwrap();
        file.flush().unwrap();

        let err = load_documents(file.path(), "embedding").unwrap_err();
        assert!(err.to_string().contains(":1: invalid document"));
    }

    #[test]
    fn test_load_documents_rejects_largest_doc_id() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 1, "vector": [1.0]}}"#).unwrap();
        writeln!(file, r#"{{"id": 4294967295}}"#).unwrap();
        file.flush().unwrap();

        let err = load_documents(file.path(), "embedding").unwrap_err();
        assert!(err.to_string().ends_with(":2"));
        assert!(format!("{err:#}").contains("doc id 4294967295 is out of range"));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 4294967295, "vector": [1.0]}}"#).unwrap();
        file.flush().unwrap();
        assert!(load_documents(file.path(), "embedding").is_err());
    }

    #[test]
    fn test_load_params() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"field": "e", "vector": [1], "l1norm": false}}"#).unwrap();
        file.flush().unwrap();

        let params = load_params(file.path()).unwrap();
        assert_eq!(params.field, "e");
        assert_eq!(params.metric, None);
    }

    #[test]
    fn test_load_params_rejects_non_object() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[1.0, 2.0]").unwrap();
        file.flush().unwrap();

        let err = load_params(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("script parameters must be a JSON object"));
    }
}
