use crate::collision::CollisionPolicy;
use crate::errors::{ExtractError, Result};
use crate::record::{FeatureMap, FlatRecord};
use serde_json::{Number, Value};

/// Value of an indicator feature.
pub const INDICATOR: u8 = 1;

/// One-hot encodes string-valued entries and produces the final feature map.
///
/// `"device.os": "iOS"` becomes `"device.os_iOS": 1`. Numbers pass through,
/// booleans become `1`/`0` and `null` entries are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoricalEncoder {
    policy: CollisionPolicy,
}

impl CategoricalEncoder {
    pub fn new(policy: CollisionPolicy) -> Self {
        CategoricalEncoder { policy }
    }

    /// Fails with [`ExtractError::NotFlat`] if an entry still holds a
    /// mapping or a sequence.
    pub fn encode(&self, counted: FlatRecord) -> Result<FeatureMap> {
        let mut features = FeatureMap::with_capacity(counted.len());

        for (key, value) in counted {
            match value {
                Value::String(category) => {
                    self.policy.insert(
                        &mut features,
                        format!("{key}_{category}"),
                        Number::from(INDICATOR),
                    )?;
                }
                Value::Number(number) => self.policy.insert(&mut features, key, number)?,
                Value::Bool(flag) => {
                    self.policy
                        .insert(&mut features, key, Number::from(u8::from(flag)))?;
                }
                Value::Null => {}
                Value::Array(_) | Value::Object(_) => return Err(ExtractError::NotFlat(key)),
            }
        }

        Ok(features)
    }
}
