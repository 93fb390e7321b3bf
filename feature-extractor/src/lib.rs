//! Turns nested auction requests into flat numeric feature maps, one per impression.

pub mod collision;
pub mod config;
pub mod counter;
pub mod dataset;
pub mod encoder;
pub mod enricher;
pub mod errors;
pub mod flattener;
pub mod metrics_defs;
pub mod namespace_filter;
pub mod pipeline;
pub mod record;
pub mod splitter;

#[cfg(test)]
mod testutils;

pub use collision::CollisionPolicy;
pub use config::PipelineConfig;
pub use enricher::{DisabledDecoder, IdentityDecoder};
pub use errors::{DecodeError, ExtractError};
pub use pipeline::Pipeline;
pub use record::{FeatureMap, RawRecord};
