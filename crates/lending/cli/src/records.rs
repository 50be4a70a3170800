//! Loading wallet record dumps

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lending_types::{RawRecord, RecordBatch};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Dump {
    Bare(Vec<RawRecord>),
    Batch(RecordBatch),
}

/// Read records from `path`, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<Vec<RawRecord>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read records from {}", path.display()))?
    };
    parse(&contents)
}

/// Accepts either the wallet's `{ "records": [...] }` response or a bare array.
pub fn parse(json: &str) -> Result<Vec<RawRecord>> {
    let dump: Dump = serde_json::from_str(json).context("record dump is not valid JSON")?;
    Ok(match dump {
        Dump::Bare(records) => records,
        Dump::Batch(batch) => batch.records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wallet_response() {
        let records =
            parse(r#"{"records":[{"recordName":"Loan","data":{"amount":"5u64.private"}}]}"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_name, "Loan");
    }

    #[test]
    fn test_parse_bare_array() {
        let records = parse(r#"[{"recordName":"Collateral","data":{}},{"recordName":"Loan"}]"#)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].data.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("records: none").is_err());
        assert!(parse("42").is_err());
    }
}
