//! Resolution of generated keys that land on an existing entry.
//!
//! Flattening, sequence counting and categorical encoding all derive new keys
//! by joining strings, so two distinct inputs can produce the same key (for
//! example two sequences both yielding `battr.3`). The default keeps the last
//! value written; `error` turns the collision into a record-scoped failure.

use crate::errors::{ExtractError, Result};
use crate::metrics_defs::FEATURES_COLLISION;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;
use shared::counter;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Last write wins.
    #[default]
    Overwrite,
    /// Report the colliding key.
    Error,
}

impl CollisionPolicy {
    /// Inserts `value` at `key`, resolving an occupied key according to the policy.
    ///
    /// An overwritten entry keeps its original position in the map.
    pub fn insert<V>(self, map: &mut IndexMap<String, V>, key: String, value: V) -> Result<()> {
        match map.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match self {
                CollisionPolicy::Overwrite => {
                    tracing::debug!(key = %entry.key(), "Feature key overwritten");
                    counter!(FEATURES_COLLISION).increment(1);
                    entry.insert(value);
                }
                CollisionPolicy::Error => {
                    return Err(ExtractError::KeyCollision(entry.key().clone()));
                }
            },
        }
        Ok(())
    }
}
