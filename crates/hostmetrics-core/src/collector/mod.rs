//! Metric collection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Collector                         │
//! │   for each source:  begin_pass → read_raw → parse_as     │
//! │                     → ReadingEvent (stamped last)        │
//! └──────────────┬──────────────────────────┬────────────────┘
//!                │                          │
//!         ┌──────▼──────┐            ┌──────▼──────┐
//!         │ProcfsSource │            │StaticSource │
//!         └──────┬──────┘            └─────────────┘
//!                │
//!         ┌──────▼──────┐
//!         │ FileSystem  │ (trait)
//!         └──────┬──────┘
//!          ┌─────┴─────┐
//!     ┌────▼───┐  ┌────▼───┐
//!     │ RealFs │  │ MockFs │
//!     └────────┘  └────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use hostmetrics_core::collector::{Collector, ConfiguredMetric, MockFs, ProcfsSource};
//! use hostmetrics_core::event::SourceAddress;
//! use hostmetrics_core::metric::registry;
//!
//! let source = ProcfsSource::new(
//!     SourceAddress::parse("host-1").unwrap(),
//!     MockFs::typical_host(),
//!     "/proc",
//! );
//! let metrics = vec![ConfiguredMetric::new(registry::resolve("CpuUserTime").unwrap())];
//! let mut collector = Collector::new().with_source(source, metrics);
//!
//! let outcomes = collector.collect_pass();
//! assert_eq!(outcomes[0].event.properties()[0].name(), "CPU User Time");
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod procfs;
pub mod source;
pub mod traits;

pub use collector::{
    Collector, ConfiguredMetric, FailureKind, MetricFailure, PassOutcome, PassTiming,
};
pub use mock::MockFs;
pub use procfs::ProcfsSource;
pub use source::{MetricSource, SourceError, StaticSource};
pub use traits::{FileSystem, RealFs};
