//! Metrics definitions for the feature extractor.

use shared::metrics_defs::{MetricDef, MetricType};

pub const RECORDS_PROCESSED: MetricDef = MetricDef {
    name: "records.processed",
    metric_type: MetricType::Counter,
    description: "Number of records handed to the pipeline",
};

pub const RECORDS_MALFORMED: MetricDef = MetricDef {
    name: "records.malformed",
    metric_type: MetricType::Counter,
    description: "Number of records skipped because of a missing or malformed `imp` field",
};

pub const IMPRESSIONS_EXTRACTED: MetricDef = MetricDef {
    name: "impressions.extracted",
    metric_type: MetricType::Counter,
    description: "Number of feature maps produced, one per impression",
};

pub const IDENTITY_DECODE_FAILURE: MetricDef = MetricDef {
    name: "identity.decode_failure",
    metric_type: MetricType::Counter,
    description: "Number of client signatures the identity decoder could not break down",
};

pub const FEATURES_COLLISION: MetricDef = MetricDef {
    name: "features.collision",
    metric_type: MetricType::Counter,
    description: "Number of generated feature keys that overwrote an existing key",
};

pub const FEATURES_PER_IMPRESSION: MetricDef = MetricDef {
    name: "features.per_impression",
    metric_type: MetricType::Histogram,
    description: "Number of entries in each produced feature map",
};

pub const ALL_METRICS: &[MetricDef] = &[
    RECORDS_PROCESSED,
    RECORDS_MALFORMED,
    IMPRESSIONS_EXTRACTED,
    IDENTITY_DECODE_FAILURE,
    FEATURES_COLLISION,
    FEATURES_PER_IMPRESSION,
];
