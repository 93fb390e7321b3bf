use thiserror::Error;

/// Result type alias for feature extraction operations
pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Errors that can occur while extracting features from a single record.
///
/// Every variant is scoped to the record (or impression) that produced it.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Record is not a mapping")]
    NotAMapping,

    #[error("Record has no `imp` field")]
    MissingImpressions,

    #[error("Record `imp` field is a {0}, expected a mapping or a sequence")]
    UnexpectedImpressionShape(&'static str),

    #[error("Feature key collision: {0}")]
    KeyCollision(String),

    #[error("Feature {0} still holds a nested value")]
    NotFlat(String),
}

/// Failure reported by an identity decoder.
///
/// Never propagated out of the enricher: any variant means "no enrichment".
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Could not parse identity signature: {0}")]
    Unparseable(String),

    #[error("Decoder returned no breakdown")]
    Empty,

    #[error("Identity decoding is disabled")]
    Unavailable,
}

/// Short, stable name of a JSON node kind for error messages and logs.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
