//! CPU time share definitions.
//!
//! Sources report each share as a percentage of the CPU time elapsed since
//! the previous sample, summed over all CPUs.

use super::{MetricCategory, MetricDefinition, RawFormat};

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuUserTime;

impl MetricDefinition for CpuUserTime {
    fn id(&self) -> &'static str {
        "CpuUserTime"
    }

    fn name(&self) -> &'static str {
        "CPU User Time"
    }

    fn description(&self) -> &'static str {
        "Percentage of CPU time spent running user-space code"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Cpu
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Percentage
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSystemTime;

impl MetricDefinition for CpuSystemTime {
    fn id(&self) -> &'static str {
        "CpuSystemTime"
    }

    fn name(&self) -> &'static str {
        "CPU System Time"
    }

    fn description(&self) -> &'static str {
        "Percentage of CPU time spent in the kernel, including interrupt handling"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Cpu
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Percentage
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuIdleTime;

impl MetricDefinition for CpuIdleTime {
    fn id(&self) -> &'static str {
        "CpuIdleTime"
    }

    fn name(&self) -> &'static str {
        "CPU Idle Time"
    }

    fn description(&self) -> &'static str {
        "Percentage of CPU time spent idle"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Cpu
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Percentage
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuIoWaitTime;

impl MetricDefinition for CpuIoWaitTime {
    fn id(&self) -> &'static str {
        "CpuIoWaitTime"
    }

    fn name(&self) -> &'static str {
        "CPU IO Wait Time"
    }

    fn description(&self) -> &'static str {
        "Percentage of CPU time spent idle while waiting for I/O to complete"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Cpu
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Percentage
    }
}
