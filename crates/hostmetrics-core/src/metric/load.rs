//! Load average definitions (`/proc/loadavg` style decimals).

use super::{MetricCategory, MetricDefinition, RawFormat};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAverageLastMinute;

impl MetricDefinition for LoadAverageLastMinute {
    fn id(&self) -> &'static str {
        "LoadAverageLastMinute"
    }

    fn name(&self) -> &'static str {
        "Load Average Last Minute"
    }

    fn description(&self) -> &'static str {
        "Average number of runnable or uninterruptible tasks over the last minute"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Load
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Decimal
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAverageLastFiveMinutes;

impl MetricDefinition for LoadAverageLastFiveMinutes {
    fn id(&self) -> &'static str {
        "LoadAverageLastFiveMinutes"
    }

    fn name(&self) -> &'static str {
        "Load Average Last 5 Minutes"
    }

    fn description(&self) -> &'static str {
        "Average number of runnable or uninterruptible tasks over the last five minutes"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Load
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Decimal
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAverageLastFifteenMinutes;

impl MetricDefinition for LoadAverageLastFifteenMinutes {
    fn id(&self) -> &'static str {
        "LoadAverageLastFifteenMinutes"
    }

    fn name(&self) -> &'static str {
        "Load Average Last 15 Minutes"
    }

    fn description(&self) -> &'static str {
        "Average number of runnable or uninterruptible tasks over the last fifteen minutes"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Load
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Decimal
    }
}
