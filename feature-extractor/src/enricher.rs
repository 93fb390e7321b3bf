//! Best-effort decoding of the client signature into structured attributes.
//!
//! The decoder is an external classifier that may fail on any input. A failure
//! leaves the record as it was; it never aborts the record.

use crate::config::PipelineConfig;
use crate::errors::DecodeError;
use crate::flattener::TreeFlattener;
use crate::metrics_defs::IDENTITY_DECODE_FAILURE;
use crate::record::{DEVICE_KEY, ImpressionRecord, Record};
use serde_json::Value;
use shared::counter;
use std::sync::Arc;

/// Turns a raw client signature into a breakdown tree.
///
/// # Example breakdown
/// ```json
/// {
///   "user_agent": {"family": "Mobile Safari", "major": "17", "minor": "1", "patch": null},
///   "os": {"family": "iOS", "major": "17", "minor": "1", "patch": null, "patch_minor": null},
///   "device": {"family": "iPhone", "brand": "Apple", "model": "iPhone"}
/// }
/// ```
pub trait IdentityDecoder: Send + Sync {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError>;
}

impl<D: IdentityDecoder + ?Sized> IdentityDecoder for Box<D> {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError> {
        (**self).decode(signature)
    }
}

impl<D: IdentityDecoder + ?Sized> IdentityDecoder for Arc<D> {
    fn decode(&self, signature: &str) -> Result<Record, DecodeError> {
        (**self).decode(signature)
    }
}

/// Decoder used when no identity classifier is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDecoder;

impl IdentityDecoder for DisabledDecoder {
    fn decode(&self, _signature: &str) -> Result<Record, DecodeError> {
        Err(DecodeError::Unavailable)
    }
}

pub struct IdentityEnricher<D> {
    decoder: D,
    signature_key: String,
    dropped_fields: Vec<String>,
    flattener: TreeFlattener,
}

impl<D: IdentityDecoder> IdentityEnricher<D> {
    pub fn new(decoder: D, config: &PipelineConfig) -> Self {
        IdentityEnricher {
            decoder,
            signature_key: config.signature_key.clone(),
            dropped_fields: config.dropped_identity_fields.clone(),
            // The breakdown is produced by the decoder and has no colliding paths.
            flattener: TreeFlattener::default(),
        }
    }

    /// Replaces `device.<signature_key>` with its flattened breakdown.
    ///
    /// A missing, null or non-string signature, or a signature the decoder
    /// cannot break down, leaves the record unchanged.
    pub fn enrich(&self, impression: ImpressionRecord) -> ImpressionRecord {
        let mut record = impression.into_record();

        let breakdown = self
            .signature(&record)
            .and_then(|signature| self.breakdown(signature));

        if let Some(breakdown) = breakdown
            && let Some(Value::Object(device)) = record.get_mut(DEVICE_KEY)
        {
            device.insert(self.signature_key.clone(), Value::Object(breakdown));
        }

        ImpressionRecord::new(record)
    }

    fn signature<'r>(&self, record: &'r Record) -> Option<&'r str> {
        match record.get(DEVICE_KEY)?.get(&self.signature_key)? {
            Value::String(signature) => Some(signature.as_str()),
            _ => None,
        }
    }

    fn breakdown(&self, signature: &str) -> Option<Record> {
        let tree = match self.decoder.decode(signature) {
            Ok(tree) if !tree.is_empty() => tree,
            Ok(_) => return self.degrade(DecodeError::Empty),
            Err(e) => return self.degrade(e),
        };

        let mut flat = match self.flattener.flatten(tree) {
            Ok(flat) => flat,
            Err(e) => return self.degrade(DecodeError::Unparseable(e.to_string())),
        };

        for field in &self.dropped_fields {
            flat.shift_remove(field);
        }

        Some(flat.into_iter().collect())
    }

    fn degrade(&self, error: DecodeError) -> Option<Record> {
        tracing::debug!(error = %error, "Client signature left undecoded");
        counter!(IDENTITY_DECODE_FAILURE).increment(1);
        None
    }
}
