//! Memory definitions. Raw samples use the `/proc/meminfo` `"<n> kB"` form.

use super::{MetricCategory, MetricDefinition, RawFormat};

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryTotal;

impl MetricDefinition for MemoryTotal {
    fn id(&self) -> &'static str {
        "MemoryTotal"
    }

    fn name(&self) -> &'static str {
        "Memory Total"
    }

    fn description(&self) -> &'static str {
        "Total usable physical memory"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Memory
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Kilobytes
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryFree;

impl MetricDefinition for MemoryFree {
    fn id(&self) -> &'static str {
        "MemoryFree"
    }

    fn name(&self) -> &'static str {
        "Memory Free"
    }

    fn description(&self) -> &'static str {
        "Physical memory not used for anything"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Memory
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Kilobytes
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAvailable;

impl MetricDefinition for MemoryAvailable {
    fn id(&self) -> &'static str {
        "MemoryAvailable"
    }

    fn name(&self) -> &'static str {
        "Memory Available"
    }

    fn description(&self) -> &'static str {
        "Estimate of memory available for new workloads without swapping"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Memory
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Kilobytes
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapFree;

impl MetricDefinition for SwapFree {
    fn id(&self) -> &'static str {
        "SwapFree"
    }

    fn name(&self) -> &'static str {
        "Swap Free"
    }

    fn description(&self) -> &'static str {
        "Unused swap space"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Memory
    }

    fn raw_format(&self) -> RawFormat {
        RawFormat::Kilobytes
    }
}
