//! Composition of the extraction stages.
//!
//! Split -> Enrich -> Filter -> Flatten -> Count -> Encode, applied to each
//! impression independently. Each stage takes ownership of its input and
//! returns a new value, so a caller that wants to keep an intermediate
//! result clones it first.

use crate::config::PipelineConfig;
use crate::counter::SequenceCounter;
use crate::encoder::CategoricalEncoder;
use crate::enricher::{IdentityDecoder, IdentityEnricher};
use crate::errors::Result;
use crate::flattener::TreeFlattener;
use crate::metrics_defs::{
    FEATURES_PER_IMPRESSION, IMPRESSIONS_EXTRACTED, RECORDS_MALFORMED, RECORDS_PROCESSED,
};
use crate::namespace_filter::NamespaceFilter;
use crate::record::{FeatureMap, ImpressionRecord, RawRecord};
use crate::splitter::ImpressionSplitter;
use shared::{counter, histogram};

pub struct Pipeline<D> {
    splitter: ImpressionSplitter,
    enricher: IdentityEnricher<D>,
    filter: NamespaceFilter,
    flattener: TreeFlattener,
    counter: SequenceCounter,
    encoder: CategoricalEncoder,
}

impl<D: IdentityDecoder> Pipeline<D> {
    pub fn new(config: &PipelineConfig, decoder: D) -> Self {
        Pipeline {
            splitter: ImpressionSplitter::new(),
            enricher: IdentityEnricher::new(decoder, config),
            filter: NamespaceFilter::new(config.namespaces.iter().cloned()),
            flattener: TreeFlattener::new(config.collision_policy),
            counter: SequenceCounter::new(config.collision_policy),
            encoder: CategoricalEncoder::new(config.collision_policy),
        }
    }

    /// Extracts one feature map per impression of `record`.
    ///
    /// Fails for the whole record only when it is malformed (no usable `imp`
    /// field). Otherwise returns a lazy iterator whose items fail
    /// individually, e.g. on a key collision under the `error` policy.
    pub fn extract<'a>(
        &'a self,
        record: &'a RawRecord,
    ) -> Result<impl Iterator<Item = Result<FeatureMap>> + 'a> {
        counter!(RECORDS_PROCESSED).increment(1);

        let impressions = self
            .splitter
            .split(record)
            .inspect_err(|_| counter!(RECORDS_MALFORMED).increment(1))?;

        Ok(impressions.map(move |impression| self.featurize(impression)))
    }

    /// Runs every stage after splitting on a single impression.
    pub fn featurize(&self, impression: ImpressionRecord) -> Result<FeatureMap> {
        let enriched = self.enricher.enrich(impression);
        let filtered = self.filter.apply(enriched.into_record());
        let flat = self.flattener.flatten(filtered)?;
        let counted = self.counter.count(flat)?;
        let features = self.encoder.encode(counted)?;

        counter!(IMPRESSIONS_EXTRACTED).increment(1);
        histogram!(FEATURES_PER_IMPRESSION).record(features.len() as f64);

        Ok(features)
    }
}
