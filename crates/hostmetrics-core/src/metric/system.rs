//! Host-wide definitions that fit no narrower category.

use super::{MetricCategory, MetricDefinition, RawFormat};

/// Time since boot. Uses the default name, which equals the identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uptime;

impl MetricDefinition for Uptime {
    fn id(&self) -> &'static str {
        "Uptime"
    }

    fn description(&self) -> &'static str {
        "Seconds elapsed since the host booted"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::System
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Seconds
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCount;

impl MetricDefinition for ProcessCount {
    fn id(&self) -> &'static str {
        "ProcessCount"
    }

    fn name(&self) -> &'static str {
        "Process Count"
    }

    fn description(&self) -> &'static str {
        "Number of kernel scheduling entities (processes and threads) on the host"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::System
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Integer
    }
}
