// src/market/query_file.rs
//! YAML query files:
//!
//! ```yaml
//! tickers: [AAPL, MSFT]   # or "AAPL MSFT"; numeric codes like 7203 work too
//! from: 2024-01-01
//! to: 2024-12-31
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::market::{parse_date, parse_tickers, PriceRequest};

#[derive(Debug, Error)]
pub enum QueryFileError {
    #[error("file '{0}' does not exist")]
    NotFound(PathBuf),
    #[error("could not read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("'{path}' is not valid YAML: {source}")]
    Yaml { path: PathBuf, source: serde_yaml::Error },
    #[error("'{path}' is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    tickers: Option<Value>,
    from: Option<String>,
    to: Option<String>,
}

/// Text of a scalar ticker entry; YAML reads `7203` as a number.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn load(path: &Path) -> Result<PriceRequest, QueryFileError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => QueryFileError::NotFound(path.to_path_buf()),
        _ => QueryFileError::Read { path: path.to_path_buf(), source },
    })?;
    parse(path, &text)
}

pub fn parse(path: &Path, text: &str) -> Result<PriceRequest, QueryFileError> {
    let malformed = |reason: String| QueryFileError::Malformed { path: path.to_path_buf(), reason };

    let raw: RawQuery = serde_yaml::from_str(text)
        .map_err(|source| QueryFileError::Yaml { path: path.to_path_buf(), source })?;

    let line = match &raw.tickers {
        None | Some(Value::Null) => String::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|v| scalar_text(v).ok_or_else(|| malformed(format!("ticker entry {v:?} is not a symbol"))))
            .collect::<Result<Vec<_>, _>>()?
            .join(" "),
        Some(other) => scalar_text(other).ok_or_else(|| malformed("'tickers' must be a list or a string".into()))?,
    };
    let tickers = parse_tickers(&line);
    if tickers.is_empty() {
        return Err(malformed("no tickers".into()));
    }

    let from = raw.from.ok_or_else(|| malformed("missing 'from'".into()))?;
    let to = raw.to.ok_or_else(|| malformed("missing 'to'".into()))?;
    let start = parse_date(&from).map_err(|e| malformed(format!("from '{from}': {e}")))?;
    let end = parse_date(&to).map_err(|e| malformed(format!("to '{to}': {e}")))?;

    debug!(path = %path.display(), ?tickers, %start, %end, "query file loaded");
    PriceRequest::new(tickers, start, end).map_err(|e| malformed(e.to_string()))
}
