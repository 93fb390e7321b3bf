use crate::record::Record;

/// Keeps the top-level entries whose key starts with one of the configured prefixes.
///
/// This is a string prefix test, not a path-segment match: the `device`
/// prefix also keeps a key such as `deviceless`.
#[derive(Debug, Clone)]
pub struct NamespaceFilter {
    prefixes: Vec<String>,
}

impl NamespaceFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NamespaceFilter {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn retains(&self, key: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }

    pub fn apply(&self, record: Record) -> Record {
        record
            .into_iter()
            .filter(|(key, _)| self.retains(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter() -> NamespaceFilter {
        NamespaceFilter::new(["device", "imp", "site", "user", "ua"])
    }

    #[test]
    fn test_keeps_only_namespaces() {
        let record = json!({
            "id": "req-1",
            "at": 2,
            "tmax": 120,
            "imp": {"id": 1},
            "device": {"os": "iOS"},
            "site": {"id": "s1"},
            "user": {"id": "u1"},
            "regs": {"coppa": 0}
        });

        let filtered = filter().apply(record.as_object().unwrap().clone());

        let mut keys: Vec<_> = filtered.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["device", "imp", "site", "user"]);
        assert_eq!(filtered["device"], json!({"os": "iOS"}));
    }

    #[test]
    fn test_prefix_match_is_coarse() {
        let filter = filter();

        assert!(filter.retains("userAgentClass"));
        assert!(filter.retains("deviceless"));
        assert!(filter.retains("ua.user_agent.family"));
        assert!(!filter.retains("app"));
        // Prefixes are case sensitive
        assert!(!filter.retains("Device"));
    }

    #[test]
    fn test_empty_record() {
        assert!(filter().apply(Record::new()).is_empty());
    }
}
