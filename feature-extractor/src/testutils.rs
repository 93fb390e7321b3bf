use crate::enricher::IdentityDecoder;
use crate::errors::DecodeError;
use crate::record::Record;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Decoder answering from a fixed signature table.
pub struct TableDecoder {
    table: HashMap<String, Record>,
}

impl TableDecoder {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Record)>,
        S: Into<String>,
    {
        TableDecoder {
            table: entries
                .into_iter()
                .map(|(signature, breakdown)| (signature.into(), breakdown))
                .collect(),
        }
    }
}

impl IdentityDecoder for TableDecoder {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError> {
        self.table
            .get(signature)
            .cloned()
            .ok_or_else(|| DecodeError::Unparseable(signature.to_string()))
    }
}

/// Decoder that rejects every signature.
pub struct FailingDecoder;

impl IdentityDecoder for FailingDecoder {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError> {
        Err(DecodeError::Unparseable(signature.to_string()))
    }
}

pub fn iphone_breakdown() -> Record {
    let breakdown = json!({
        "user_agent": {"family": "Mobile Safari", "major": "17", "minor": "1", "patch": "0"},
        "os": {"family": "iOS", "major": "17", "minor": "1", "patch": "2", "patch_minor": "0"},
        "device": {"family": "iPhone", "brand": "Apple", "model": "iPhone"}
    });

    match breakdown {
        Value::Object(map) => map,
        _ => unreachable!("breakdown fixture is a mapping"),
    }
}
