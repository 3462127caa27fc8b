//! Metric definitions.
//!
//! A metric definition describes one measurable OS quantity and knows how to
//! turn a raw sample into a typed [`Property`]. Concrete definitions are
//! stateless unit types that only supply constants; the parsing itself is
//! driven by their [`RawFormat`].

mod cpu;
mod format;
mod load;
mod memory;
mod property;
pub mod registry;
mod system;

use std::fmt;

pub use cpu::{CpuIdleTime, CpuIoWaitTime, CpuSystemTime, CpuUserTime};
pub use format::{ParseError, RawFormat};
pub use load::{LoadAverageLastFifteenMinutes, LoadAverageLastFiveMinutes, LoadAverageLastMinute};
pub use memory::{MemoryAvailable, MemoryFree, MemoryTotal, SwapFree};
pub use property::{Property, PropertyValue};
pub use registry::UnknownMetricError;
pub use system::{ProcessCount, Uptime};

/// Broad grouping of a metric, used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Cpu,
    Load,
    Memory,
    System,
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetricCategory::Cpu => "cpu",
            MetricCategory::Load => "load",
            MetricCategory::Memory => "memory",
            MetricCategory::System => "system",
        };
        f.pad(s)
    }
}

/// One kind of measurable OS quantity.
///
/// Implementations must return the same values on every call: name and
/// description are fixed for the lifetime of the process.
pub trait MetricDefinition: fmt::Debug + Send + Sync {
    /// Registry identifier. By convention the simple name of the implementing type.
    fn id(&self) -> &'static str;

    /// Human-readable name. Defaults to [`MetricDefinition::id`].
    fn name(&self) -> &'static str {
        self.id()
    }

    /// Explanatory text, never empty.
    fn description(&self) -> &'static str;

    fn category(&self) -> MetricCategory;

    /// Encoding this definition expects from a source unless overridden.
    fn raw_format(&self) -> RawFormat;

    /// Converts a raw sample using [`MetricDefinition::raw_format`].
    fn parse(&self, raw: &str) -> Result<Property, ParseError> {
        self.parse_as(raw, self.raw_format())
    }

    /// Converts a raw sample using an explicit format.
    fn parse_as(&self, raw: &str, format: RawFormat) -> Result<Property, ParseError> {
        let value = format.parse(raw)?;
        Ok(Property::new(self.name(), value))
    }
}
