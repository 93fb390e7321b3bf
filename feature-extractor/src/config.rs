use crate::collision::CollisionPolicy;
use crate::record::SEPARATOR;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("At least one namespace prefix is required")]
    NoNamespaces,

    #[error("Empty namespace prefix")]
    EmptyNamespace,

    #[error("Signature key cannot be empty")]
    EmptySignatureKey,

    #[error("Signature key {0:?} contains the path separator")]
    SeparatorInSignatureKey(String),

    #[error("Empty dropped identity field")]
    EmptyDroppedField,
}

/// Feature extraction pipeline configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Top-level key prefixes kept by the namespace filter.
    ///
    /// Matching is a plain starts-with test: `user` also keeps `userAgentClass`.
    pub namespaces: Vec<String>,
    /// Key under `device` holding the client signature
    pub signature_key: String,
    /// Flattened sub-paths of the decoded identity removed before flattening
    /// the record (minor/patch version components).
    pub dropped_identity_fields: Vec<String>,
    /// What to do when two generated feature keys coincide
    pub collision_policy: CollisionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            namespaces: ["device", "imp", "site", "user", "ua"]
                .into_iter()
                .map(String::from)
                .collect(),
            signature_key: "ua".into(),
            dropped_identity_fields: [
                "user_agent.minor",
                "user_agent.patch",
                "os.patch",
                "os.patch_minor",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            collision_policy: CollisionPolicy::Overwrite,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.namespaces.is_empty() {
            return Err(ValidationError::NoNamespaces);
        }

        // An empty prefix would match every key
        if self.namespaces.iter().any(|prefix| prefix.is_empty()) {
            return Err(ValidationError::EmptyNamespace);
        }

        if self.signature_key.is_empty() {
            return Err(ValidationError::EmptySignatureKey);
        }

        if self.signature_key.contains(SEPARATOR) {
            return Err(ValidationError::SeparatorInSignatureKey(
                self.signature_key.clone(),
            ));
        }

        if self.dropped_identity_fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::EmptyDroppedField);
        }

        Ok(())
    }
}
