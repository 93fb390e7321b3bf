//! Line-delimited JSON input.
//!
//! Each non-blank line holds one document. Labelled datasets wrap the request
//! in an observation:
//!
//! ```json
//! {"converted": 1, "winning_prices": [0.42], "req": {"imp": [...], "device": {...}}}
//! ```

use crate::record::RawRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read line {line}: {source}")]
    Io { line: usize, source: io::Error },

    #[error("Invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

impl DatasetError {
    pub fn line(&self) -> usize {
        match self {
            DatasetError::Io { line, .. } | DatasetError::Json { line, .. } => *line,
        }
    }
}

/// One labelled auction request.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    #[serde(default)]
    converted: Option<Value>,
    #[serde(default)]
    winning_prices: Vec<Value>,
    pub req: RawRecord,
}

impl Observation {
    /// Conversion label. Accepts booleans, numbers and integer strings.
    pub fn converted(&self) -> Option<bool> {
        match self.converted.as_ref()? {
            Value::Bool(converted) => Some(*converted),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => s.trim().parse::<i64>().ok().map(|n| n != 0),
            _ => None,
        }
    }

    /// First winning price, as a number or a numeric string.
    pub fn winning_bid(&self) -> Option<f64> {
        match self.winning_prices.first()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Lazily parses every non-blank line of `reader` as a `T`.
///
/// Items carry their 1-based line number. A line that fails to read or parse
/// is an error for that line only; iteration continues with the next one.
pub fn read_json_lines<R, T>(reader: R) -> impl Iterator<Item = Result<(usize, T), DatasetError>>
where
    R: BufRead,
    T: DeserializeOwned,
{
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_number = index + 1;
            match line {
                Err(source) => Some(Err(DatasetError::Io {
                    line: line_number,
                    source,
                })),
                Ok(text) if text.trim().is_empty() => None,
                Ok(text) => Some(
                    serde_json::from_str(&text)
                        .map(|document| (line_number, document))
                        .map_err(|source| DatasetError::Json {
                            line: line_number,
                            source,
                        }),
                ),
            }
        })
}

pub fn read_observations<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(usize, Observation), DatasetError>> {
    read_json_lines(reader)
}
