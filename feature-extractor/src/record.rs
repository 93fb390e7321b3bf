//! Tree and map types passed between pipeline stages.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Joins path segments of flattened keys. Field names must not contain it.
pub const SEPARATOR: char = '.';

/// Key holding the impression sub-tree (or sequence of them) of a request.
pub const IMP_KEY: &str = "imp";

/// Namespace holding the client signature.
pub const DEVICE_KEY: &str = "device";

/// One auction request as read from the input source.
pub type RawRecord = Value;

/// Top-level entries of a request.
pub type Record = Map<String, Value>;

/// Single-level mapping keyed by dotted paths. Values are scalars or sequences.
pub type FlatRecord = IndexMap<String, Value>;

/// Final per-impression feature vector: every value is numeric.
pub type FeatureMap = IndexMap<String, Number>;

/// A request carrying exactly one impression at [`IMP_KEY`].
///
/// Only the splitter creates these; each one owns a deep copy of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpressionRecord {
    record: Record,
}

impl ImpressionRecord {
    pub(crate) fn new(record: Record) -> Self {
        ImpressionRecord { record }
    }

    pub fn impression(&self) -> Option<&Value> {
        self.record.get(IMP_KEY)
    }

    pub fn as_record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

/// Appends `path` to `key`, skipping empty segments on either side.
pub(crate) fn join_path(key: &str, path: &str) -> String {
    normalize_path(&format!("{key}{SEPARATOR}{path}"))
}

/// Drops empty segments, so the result has no leading, trailing or doubled separator.
pub(crate) fn normalize_path(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());

    for segment in key.split(SEPARATOR).filter(|segment| !segment.is_empty()) {
        if !normalized.is_empty() {
            normalized.push(SEPARATOR);
        }
        normalized.push_str(segment);
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("device", "os"), "device.os");
        assert_eq!(join_path("", "os"), "os");
        assert_eq!(join_path("imp", "battr.3"), "imp.battr.3");
    }

    #[test]
    fn test_empty_segments_skipped() {
        assert_eq!(join_path("imp", ""), "imp");
        assert_eq!(join_path("imp.battr", ""), "imp.battr");
        assert_eq!(normalize_path(".a"), "a");
        assert_eq!(normalize_path("..a"), "a");
        assert_eq!(normalize_path("a..b."), "a.b");
        assert_eq!(normalize_path("a.b"), "a.b");
        assert_eq!(normalize_path(""), "");
    }
}
