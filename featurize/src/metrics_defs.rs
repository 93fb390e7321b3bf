//! Metrics definitions for the featurize driver.

use shared::metrics_defs::{MetricDef, MetricType};

pub const INPUT_LINES_INVALID: MetricDef = MetricDef {
    name: "input.lines.invalid",
    metric_type: MetricType::Counter,
    description: "Number of input lines that could not be read or parsed",
};

pub const IMPRESSIONS_FAILED: MetricDef = MetricDef {
    name: "impressions.failed",
    metric_type: MetricType::Counter,
    description: "Number of impressions dropped because feature extraction failed",
};

pub const ROWS_WRITTEN: MetricDef = MetricDef {
    name: "rows.written",
    metric_type: MetricType::Counter,
    description: "Number of feature rows written to the output",
};

pub const ALL_METRICS: &[MetricDef] = &[INPUT_LINES_INVALID, IMPRESSIONS_FAILED, ROWS_WRITTEN];
