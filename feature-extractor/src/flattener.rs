//! Collapses nested mappings into a single level keyed by dotted paths.
//!
//! Only mapping nesting is collapsed. Sequences and scalars are kept as they
//! are; sequences are expanded later by the sequence counter.

use crate::collision::CollisionPolicy;
use crate::errors::Result;
use crate::record::{FlatRecord, Record, join_path, normalize_path};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct TreeFlattener {
    policy: CollisionPolicy,
}

impl TreeFlattener {
    pub fn new(policy: CollisionPolicy) -> Self {
        TreeFlattener { policy }
    }

    /// Flattens `tree` so that no value in the result is a mapping.
    ///
    /// A leaf at depth D gets a key of D segments. Empty nested mappings have
    /// no leaves and therefore disappear. Empty field names contribute no
    /// segment: `{"imp": {"": 1}}` flattens to `imp`.
    pub fn flatten(&self, tree: Record) -> Result<FlatRecord> {
        let mut flat = FlatRecord::with_capacity(tree.len());

        for (key, value) in tree {
            match value {
                Value::Object(nested) => {
                    for (path, leaf) in self.flatten(nested)? {
                        self.policy.insert(&mut flat, join_path(&key, &path), leaf)?;
                    }
                }
                leaf => {
                    self.policy.insert(&mut flat, normalize_path(&key), leaf)?;
                }
            }
        }

        Ok(flat)
    }
}
