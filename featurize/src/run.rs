//! Drives the pipeline over line-delimited input and writes one JSON row per impression.

use crate::config::InputFormat;
use crate::metrics_defs::{IMPRESSIONS_FAILED, INPUT_LINES_INVALID, ROWS_WRITTEN};
use feature_extractor::dataset::{DatasetError, read_json_lines, read_observations};
use feature_extractor::{FeatureMap, IdentityDecoder, Pipeline, RawRecord};
use serde::Serialize;
use shared::counter;
use std::io::{self, BufRead, Write};

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize feature row: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub invalid_lines: usize,
    pub malformed_records: usize,
    pub failed_impressions: usize,
    pub rows: usize,
}

struct LabelledRecord {
    line: usize,
    converted: Option<bool>,
    winning_bid: Option<f64>,
    record: RawRecord,
}

#[derive(Serialize)]
struct FeatureRow<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_bid: Option<f64>,
    features: &'a FeatureMap,
}

/// Extracts features for every record read from `reader`.
///
/// Unreadable lines, malformed records and failing impressions are logged and
/// skipped. Only failures to write the output abort the run.
pub fn extract<D, R, W>(
    pipeline: &Pipeline<D>,
    format: InputFormat,
    reader: R,
    writer: W,
) -> Result<Summary, RunError>
where
    D: IdentityDecoder,
    R: BufRead,
    W: Write,
{
    let mut extraction = Extraction {
        pipeline,
        writer,
        summary: Summary::default(),
    };

    match format {
        InputFormat::Observation => {
            for item in read_observations(reader) {
                extraction.handle(item.map(|(line, observation)| LabelledRecord {
                    line,
                    converted: observation.converted(),
                    winning_bid: observation.winning_bid(),
                    record: observation.req,
                }))?;
            }
        }
        InputFormat::Request => {
            for item in read_json_lines(reader) {
                extraction.handle(item.map(|(line, record)| LabelledRecord {
                    line,
                    converted: None,
                    winning_bid: None,
                    record,
                }))?;
            }
        }
    }

    extraction.writer.flush()?;
    Ok(extraction.summary)
}

struct Extraction<'p, D, W> {
    pipeline: &'p Pipeline<D>,
    writer: W,
    summary: Summary,
}

impl<D: IdentityDecoder, W: Write> Extraction<'_, D, W> {
    fn handle(&mut self, item: Result<LabelledRecord, DatasetError>) -> Result<(), RunError> {
        let labelled = match item {
            Ok(labelled) => labelled,
            Err(e) => {
                tracing::warn!(line = e.line(), error = %e, "Skipping unreadable input line");
                counter!(INPUT_LINES_INVALID).increment(1);
                self.summary.invalid_lines += 1;
                return Ok(());
            }
        };
        self.summary.records += 1;

        let pipeline = self.pipeline;
        let impressions = match pipeline.extract(&labelled.record) {
            Ok(impressions) => impressions,
            Err(e) => {
                tracing::warn!(line = labelled.line, error = %e, "Skipping malformed record");
                self.summary.malformed_records += 1;
                return Ok(());
            }
        };

        for (index, result) in impressions.enumerate() {
            let features = match result {
                Ok(features) => features,
                Err(e) => {
                    tracing::warn!(
                        line = labelled.line,
                        impression = index,
                        error = %e,
                        "Skipping impression"
                    );
                    counter!(IMPRESSIONS_FAILED).increment(1);
                    self.summary.failed_impressions += 1;
                    continue;
                }
            };

            let row = FeatureRow {
                line: labelled.line,
                converted: labelled.converted,
                winning_bid: labelled.winning_bid,
                features: &features,
            };
            serde_json::to_writer(&mut self.writer, &row)?;
            self.writer.write_all(b"\n")?;
            counter!(ROWS_WRITTEN).increment(1);
            self.summary.rows += 1;
        }

        Ok(())
    }
}
