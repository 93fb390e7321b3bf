//! Client signature decoding backed by ua-parser regex definitions.

use feature_extractor::record::Record;
use feature_extractor::{DecodeError, IdentityDecoder};
use serde_json::Value;
use std::path::Path;
use uaparser::{Parser, UserAgentParser};

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("could not read ua-parser regexes: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not build ua-parser from regexes: {0}")]
    Build(String),
}

pub struct UaParserDecoder {
    parser: UserAgentParser,
}

impl UaParserDecoder {
    /// Loads a `regexes.yaml` in the ua-parser core format.
    pub fn from_file(path: &Path) -> Result<Self, IdentityError> {
        let regexes = std::fs::read(path)?;
        let parser = UserAgentParser::from_bytes(&regexes)
            .map_err(|e| IdentityError::Build(format!("{e:?}")))?;

        Ok(UaParserDecoder { parser })
    }
}

impl IdentityDecoder for UaParserDecoder {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError> {
        if signature.trim().is_empty() {
            return Err(DecodeError::Unparseable("empty signature".into()));
        }

        let client = self.parser.parse(signature);
        let user_agent = section([
            ("family", Value::from(client.user_agent.family)),
            ("major", Value::from(client.user_agent.major)),
            ("minor", Value::from(client.user_agent.minor)),
            ("patch", Value::from(client.user_agent.patch)),
        ]);
        let os = section([
            ("family", Value::from(client.os.family)),
            ("major", Value::from(client.os.major)),
            ("minor", Value::from(client.os.minor)),
            ("patch", Value::from(client.os.patch)),
            ("patch_minor", Value::from(client.os.patch_minor)),
        ]);
        let device = section([
            ("family", Value::from(client.device.family)),
            ("brand", Value::from(client.device.brand)),
            ("model", Value::from(client.device.model)),
        ]);

        Ok(Record::from_iter([
            ("user_agent".to_string(), user_agent),
            ("os".to_string(), os),
            ("device".to_string(), device),
        ]))
    }
}

/// Missing parts of a breakdown stay as `null` fields.
fn section<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}
