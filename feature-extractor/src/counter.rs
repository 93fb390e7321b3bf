use crate::collision::CollisionPolicy;
use crate::errors::Result;
use crate::record::{FlatRecord, join_path};
use indexmap::IndexMap;
use serde_json::Value;

/// Replaces sequence-valued entries with one count per distinct element.
///
/// `"imp.battr": [3, 3, 9]` becomes `"imp.battr.3": 2` and `"imp.battr.9": 1`.
/// An empty sequence removes its key without adding any entry. An empty
/// string element adds no segment, so `"imp.battr": [""]` counts into `imp.battr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceCounter {
    policy: CollisionPolicy,
}

impl SequenceCounter {
    pub fn new(policy: CollisionPolicy) -> Self {
        SequenceCounter { policy }
    }

    pub fn count(&self, flat: FlatRecord) -> Result<FlatRecord> {
        let mut counted = FlatRecord::with_capacity(flat.len());

        for (key, value) in flat {
            match value {
                Value::Array(elements) => {
                    for (element, count) in tally(elements) {
                        self.policy.insert(
                            &mut counted,
                            join_path(&key, element.segment()),
                            Value::from(count),
                        )?;
                    }
                }
                other => self.policy.insert(&mut counted, key, other)?,
            }
        }

        Ok(counted)
    }
}

/// Hashable identity of a sequence element.
///
/// Strings keep their text; every other element is identified by its compact
/// JSON text. The string flag keeps `3` and `"3"` apart.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Element {
    is_string: bool,
    text: String,
}

impl Element {
    fn new(value: Value) -> Self {
        match value {
            Value::String(text) => Element {
                is_string: true,
                text,
            },
            other => Element {
                is_string: false,
                text: other.to_string(),
            },
        }
    }

    /// Key segment under which the element is counted.
    fn segment(&self) -> &str {
        &self.text
    }
}

/// Counts elements in order of first occurrence.
fn tally(elements: Vec<Value>) -> IndexMap<Element, u64> {
    let mut tally = IndexMap::with_capacity(elements.len());

    for element in elements {
        *tally.entry(Element::new(element)).or_insert(0) += 1;
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExtractError;
    use serde_json::json;

    fn flat(entries: &[(&str, Value)]) -> FlatRecord {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_counts_per_distinct_element() {
        let counted = SequenceCounter::default()
            .count(flat(&[
                ("imp.battr", json!([3, 3, 9])),
                ("imp.id", json!(1)),
            ]))
            .unwrap();

        assert_eq!(counted.len(), 3);
        assert_eq!(counted["imp.battr.3"], json!(2));
        assert_eq!(counted["imp.battr.9"], json!(1));
        assert_eq!(counted["imp.id"], json!(1));
        assert!(!counted.contains_key("imp.battr"));
    }

    #[test]
    fn test_counts_sum_to_length() {
        let sequence = json!(["IAB1", "IAB2", "IAB1", "IAB1", "IAB3-1", "IAB2"]);
        let length = sequence.as_array().unwrap().len() as u64;

        let counted = SequenceCounter::default()
            .count(flat(&[("site.cat", sequence)]))
            .unwrap();

        let total: u64 = counted
            .iter()
            .filter(|(key, _)| key.starts_with("site.cat."))
            .map(|(_, value)| value.as_u64().unwrap())
            .sum();
        assert_eq!(total, length);
        assert_eq!(counted["site.cat.IAB1"], json!(3));
        assert_eq!(counted["site.cat.IAB3-1"], json!(1));
    }

    #[test]
    fn test_empty_sequence_removes_key() {
        let counted = SequenceCounter::default()
            .count(flat(&[("user.keywords", json!([])), ("user.id", json!("u"))]))
            .unwrap();

        assert_eq!(counted, flat(&[("user.id", json!("u"))]));
    }

    #[test]
    fn test_element_rendering() {
        let counted = SequenceCounter::default()
            .count(flat(&[(
                "x",
                json!([true, null, 1.5, {"id": 1}, [1, 2], "s"]),
            )]))
            .unwrap();

        let keys: Vec<_> = counted.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["x.true", "x.null", "x.1.5", r#"x.{"id":1}"#, "x.[1,2]", "x.s"]
        );
    }

    #[test]
    fn test_collision_last_write_wins() {
        // Number 3 and string "3" are distinct elements with the same key
        let counted = SequenceCounter::default()
            .count(flat(&[("imp.battr", json!([3, "3", "3"]))]))
            .unwrap();
        assert_eq!(counted.len(), 1);
        assert_eq!(counted["imp.battr.3"], json!(2));

        // A passthrough entry can be overwritten by a later generated key
        let counted = SequenceCounter::default()
            .count(flat(&[
                ("imp.battr.3", json!(100)),
                ("imp.battr", json!([3])),
            ]))
            .unwrap();
        assert_eq!(counted["imp.battr.3"], json!(1));
    }

    #[test]
    fn test_empty_string_element() {
        let counted = SequenceCounter::default()
            .count(flat(&[("imp.battr", json!(["", "", "a"]))]))
            .unwrap();

        assert_eq!(
            counted,
            flat(&[("imp.battr", json!(2)), ("imp.battr.a", json!(1))])
        );
    }

    #[test]
    fn test_many_distinct_elements() {
        let segments: Vec<Value> = (0..50_000)
            .map(|i| Value::String(format!("seg{i}")))
            .chain((0..50_000).map(|i| Value::String(format!("seg{i}"))))
            .collect();

        let counted = SequenceCounter::default()
            .count(flat(&[("user.segments", Value::Array(segments))]))
            .unwrap();

        assert_eq!(counted.len(), 50_000);
        assert!(counted.values().all(|count| *count == json!(2)));
        // First occurrence order is kept
        assert_eq!(counted.get_index(0).unwrap().0, "user.segments.seg0");
        assert_eq!(counted.get_index(49_999).unwrap().0, "user.segments.seg49999");
    }

    #[test]
    fn test_collision_error() {
        let err = SequenceCounter::new(CollisionPolicy::Error)
            .count(flat(&[
                ("imp.battr.3", json!(100)),
                ("imp.battr", json!([3])),
            ]))
            .unwrap_err();

        assert!(matches!(err, ExtractError::KeyCollision(ref key) if key == "imp.battr.3"));
    }
}
