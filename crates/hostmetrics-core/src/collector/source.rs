//! Raw-reading sources.
//!
//! A source supplies one raw sample per (source, definition) pair. The
//! collector never interprets these strings itself; it hands them to the
//! definition's parser.

use std::collections::BTreeMap;
use std::io;

use crate::event::SourceAddress;
use crate::metric::{MetricDefinition, ParseError};

/// Failure to obtain a raw sample.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source has no way to read this metric.
    #[error("metric {0} is not supported by this source")]
    Unsupported(String),
    /// The source can read this metric but the value is currently absent.
    #[error("no value for metric {0}")]
    Missing(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: ParseError,
    },
}

/// Supplier of raw samples for one source address.
pub trait MetricSource: Send {
    fn address(&self) -> &SourceAddress;

    /// Called once at the start of every collection pass.
    fn begin_pass(&mut self) {}

    /// Returns the raw sample for `definition` in this pass.
    fn read_raw(&mut self, definition: &dyn MetricDefinition) -> Result<String, SourceError>;
}

/// Source returning canned raw values keyed by metric identifier.
#[derive(Debug, Clone)]
pub struct StaticSource {
    address: SourceAddress,
    values: BTreeMap<String, String>,
}

impl StaticSource {
    pub fn new(address: SourceAddress, values: BTreeMap<String, String>) -> Self {
        Self { address, values }
    }

    pub fn with_value(mut self, id: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.insert(id.into(), raw.into());
        self
    }
}

impl MetricSource for StaticSource {
    fn address(&self) -> &SourceAddress {
        &self.address
    }

    fn read_raw(&mut self, definition: &dyn MetricDefinition) -> Result<String, SourceError> {
        self.values
            .get(definition.id())
            .cloned()
            .ok_or_else(|| SourceError::Missing(definition.id().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{CpuUserTime, Uptime};

    #[test]
    fn test_static_source() {
        let address = SourceAddress::parse("fixture").unwrap();
        let mut source =
            StaticSource::new(address, BTreeMap::new()).with_value("CpuUserTime", "12.5");

        assert_eq!(source.address(), &"fixture");
        assert_eq!(source.read_raw(&CpuUserTime).unwrap(), "12.5");

        let err = source.read_raw(&Uptime).unwrap_err();
        assert!(matches!(err, SourceError::Missing(ref id) if id == "Uptime"));
        assert_eq!(err.to_string(), "no value for metric Uptime");
    }
}
