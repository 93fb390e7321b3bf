//! Expands a request carrying several impressions into one request per impression.

use crate::errors::{ExtractError, Result, kind_of};
use crate::record::{IMP_KEY, ImpressionRecord, RawRecord, Record};
use serde_json::Value;

/// Splits requests on their `imp` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImpressionSplitter;

impl ImpressionSplitter {
    pub fn new() -> Self {
        ImpressionSplitter
    }

    /// Returns a lazy iterator of single-impression requests.
    ///
    /// A mapping at `imp` yields the request once, a sequence yields one deep
    /// copy per element and an empty sequence yields nothing. A missing `imp`
    /// or one holding a scalar is a malformed record.
    pub fn split<'a>(&self, record: &'a RawRecord) -> Result<Impressions<'a>> {
        let Value::Object(request) = record else {
            return Err(ExtractError::NotAMapping);
        };

        let pending = match request.get(IMP_KEY) {
            None => return Err(ExtractError::MissingImpressions),
            Some(Value::Array(impressions)) => Pending::Many(impressions.iter()),
            Some(impression @ Value::Object(_)) => Pending::Single(Some(impression)),
            Some(other) => return Err(ExtractError::UnexpectedImpressionShape(kind_of(other))),
        };

        Ok(Impressions { request, pending })
    }
}

enum Pending<'a> {
    Single(Option<&'a Value>),
    Many(std::slice::Iter<'a, Value>),
}

/// Iterator returned by [`ImpressionSplitter::split`].
pub struct Impressions<'a> {
    request: &'a Record,
    pending: Pending<'a>,
}

impl Iterator for Impressions<'_> {
    type Item = ImpressionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let impression = match &mut self.pending {
            Pending::Single(slot) => slot.take()?,
            Pending::Many(iter) => iter.next()?,
        };

        // Same key order as the request, with the impression in place of `imp`
        let record: Record = self
            .request
            .iter()
            .map(|(key, value)| {
                let value = if key == IMP_KEY { impression } else { value };
                (key.clone(), value.clone())
            })
            .collect();

        Some(ImpressionRecord::new(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.pending {
            Pending::Single(slot) => usize::from(slot.is_some()),
            Pending::Many(iter) => iter.len(),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Impressions<'_> {}
