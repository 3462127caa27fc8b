//! Collection pass over all configured sources.
//!
//! The `Collector` owns the sources and the metrics configured for each of
//! them. One call to [`Collector::collect_pass`] produces one
//! [`ReadingEvent`] per source.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::collector::source::{MetricSource, SourceError};
use crate::event::{ReadingEvent, SourceAddress};
use crate::metric::{MetricDefinition, ParseError, Property, RawFormat};

/// A definition as configured for one source, with an optional raw format override.
#[derive(Debug, Clone)]
pub struct ConfiguredMetric {
    definition: Arc<dyn MetricDefinition>,
    format: Option<RawFormat>,
}

impl ConfiguredMetric {
    pub fn new(definition: Arc<dyn MetricDefinition>) -> Self {
        Self {
            definition,
            format: None,
        }
    }

    pub fn with_format(mut self, format: RawFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn definition(&self) -> &Arc<dyn MetricDefinition> {
        &self.definition
    }

    /// Effective raw format: the override if set, otherwise the definition's.
    pub fn format(&self) -> RawFormat {
        self.format.unwrap_or_else(|| self.definition.raw_format())
    }
}

/// Which stage of a reading failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The source could not supply a raw sample.
    Source,
    /// The raw sample did not match the expected format.
    Parse,
}

/// One metric that produced no property during a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricFailure {
    pub metric: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl MetricFailure {
    fn source(metric: &str, err: &SourceError) -> Self {
        Self {
            metric: metric.to_string(),
            kind: FailureKind::Source,
            reason: err.to_string(),
        }
    }

    fn parse(metric: &str, raw: &str, err: &ParseError) -> Self {
        Self {
            metric: metric.to_string(),
            kind: FailureKind::Parse,
            reason: format!("{} (raw sample '{}')", err, raw.trim()),
        }
    }
}

/// Result of one pass over one source.
#[derive(Debug, Clone, Serialize)]
pub struct PassOutcome {
    pub event: ReadingEvent,
    pub failures: Vec<MetricFailure>,
}

impl PassOutcome {
    /// Whether every configured metric produced a property.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Timing information for the last pass.
#[derive(Debug, Clone, Default)]
pub struct PassTiming {
    pub total: Duration,
    /// Time spent per source, in collection order.
    pub sources: Vec<(SourceAddress, Duration)>,
}

struct SourceBinding {
    source: Box<dyn MetricSource>,
    metrics: Vec<ConfiguredMetric>,
}

impl SourceBinding {
    fn collect(&mut self, clock: &dyn Clock) -> PassOutcome {
        self.source.begin_pass();

        let mut properties = Vec::with_capacity(self.metrics.len());
        let mut failures = Vec::new();

        for metric in &self.metrics {
            let definition = metric.definition();
            let id = definition.id();

            let result = match self.source.read_raw(definition.as_ref()) {
                Ok(raw) => {
                    trace!("{}: {} raw sample '{}'", self.source.address(), id, raw.trim());
                    definition
                        .parse_as(&raw, metric.format())
                        .map_err(|e| MetricFailure::parse(id, &raw, &e))
                }
                Err(e) => Err(MetricFailure::source(id, &e)),
            };

            match result {
                Ok(property) => properties.push(property),
                Err(failure) => {
                    debug!(
                        "{}: {} failed: {}",
                        self.source.address(),
                        id,
                        failure.reason
                    );
                    failures.push(failure);
                }
            }
        }

        let event = ReadingEvent::with_clock(self.source.address().clone(), properties, clock);
        PassOutcome { event, failures }
    }
}

/// Runs collection passes over a fixed set of sources.
pub struct Collector {
    bindings: Vec<SourceBinding>,
    clock: Arc<dyn Clock>,
    passes: u64,
    last_timing: Option<PassTiming>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Creates a collector without sources, stamping events with the wall clock.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            clock: Arc::new(SystemClock),
            passes: 0,
            last_timing: None,
        }
    }

    /// Replaces the clock used to stamp events.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Adds a source with the metrics to read from it, in event order.
    pub fn add_source(
        &mut self,
        source: impl MetricSource + 'static,
        metrics: Vec<ConfiguredMetric>,
    ) {
        self.bindings.push(SourceBinding {
            source: Box::new(source),
            metrics,
        });
    }

    pub fn with_source(
        mut self,
        source: impl MetricSource + 'static,
        metrics: Vec<ConfiguredMetric>,
    ) -> Self {
        self.add_source(source, metrics);
        self
    }

    pub fn source_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of completed passes.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Returns timing information from the last pass.
    pub fn last_timing(&self) -> Option<&PassTiming> {
        self.last_timing.as_ref()
    }

    /// Runs one pass and returns one outcome per source, in source order.
    ///
    /// A failing metric never aborts the pass; it is reported in the
    /// outcome's `failures` and the remaining metrics are still read.
    pub fn collect_pass(&mut self) -> Vec<PassOutcome> {
        let total_start = Instant::now();
        let mut timing = PassTiming::default();
        let mut outcomes = Vec::with_capacity(self.bindings.len());

        for binding in &mut self.bindings {
            let start = Instant::now();
            let outcome = binding.collect(self.clock.as_ref());
            timing
                .sources
                .push((outcome.event.source_address().clone(), start.elapsed()));
            outcomes.push(outcome);
        }

        timing.total = total_start.elapsed();
        self.last_timing = Some(timing);
        self.passes += 1;

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::collector::mock::MockFs;
    use crate::collector::procfs::ProcfsSource;
    use crate::collector::source::StaticSource;
    use crate::metric::{PropertyValue, registry};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn metrics(ids: &[&str]) -> Vec<ConfiguredMetric> {
        ids.iter()
            .map(|id| ConfiguredMetric::new(registry::resolve(id).unwrap()))
            .collect()
    }

    fn fixture(values: &[(&str, &str)]) -> StaticSource {
        let values = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        StaticSource::new(SourceAddress::parse("fixture").unwrap(), values)
    }

    #[test]
    fn test_failures_do_not_abort_pass() {
        let source = fixture(&[
            ("CpuUserTime", "12.5"),
            ("LoadAverageLastMinute", "bogus"),
            ("Uptime", "100"),
        ]);
        let mut collector = Collector::new().with_source(
            source,
            metrics(&["CpuUserTime", "LoadAverageLastMinute", "MemoryFree", "Uptime"]),
        );

        let outcomes = collector.collect_pass();
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];

        let names: Vec<&str> = outcome.event.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["CPU User Time", "Uptime"]);

        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].metric, "LoadAverageLastMinute");
        assert_eq!(outcome.failures[0].kind, FailureKind::Parse);
        assert!(outcome.failures[0].reason.contains("'bogus'"));
        assert_eq!(outcome.failures[1].metric, "MemoryFree");
        assert_eq!(outcome.failures[1].kind, FailureKind::Source);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_event_stamped_by_clock() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::new(at));
        let mut collector = Collector::new()
            .with_clock(clock.clone())
            .with_source(fixture(&[("Uptime", "1")]), metrics(&["Uptime"]));

        let first = collector.collect_pass();
        clock.advance(chrono::Duration::seconds(10));
        let second = collector.collect_pass();

        assert_eq!(first[0].event.timestamp(), at);
        assert_eq!(
            second[0].event.timestamp(),
            at + chrono::Duration::seconds(10)
        );
        assert_eq!(collector.pass_count(), 2);
    }

    #[test]
    fn test_timestamp_within_pass_bounds() {
        let mut collector = Collector::new().with_source(
            ProcfsSource::new(
                SourceAddress::parse("host-1").unwrap(),
                MockFs::typical_host(),
                "/proc",
            ),
            metrics(&["CpuUserTime", "MemoryTotal"]),
        );

        let before = Utc::now();
        let outcomes = collector.collect_pass();
        let after = Utc::now();

        let event = &outcomes[0].event;
        assert!(event.timestamp() >= before && event.timestamp() <= after);
        assert!(outcomes[0].is_complete());
    }

    #[test]
    fn test_one_event_per_source_in_order() {
        let mut collector = Collector::new()
            .with_source(
                ProcfsSource::new(
                    SourceAddress::parse("host-1").unwrap(),
                    MockFs::typical_host(),
                    "/proc",
                ),
                metrics(&["LoadAverageLastMinute", "MemoryTotal"]),
            )
            .with_source(fixture(&[("CpuUserTime", "5%")]), metrics(&["CpuUserTime"]));

        let outcomes = collector.collect_pass();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].event.source_address(), &"host-1");
        assert_eq!(
            outcomes[0].event.properties()[1].value(),
            &PropertyValue::Bytes(16384000 * 1024)
        );
        assert_eq!(outcomes[1].event.source_address(), &"fixture");

        let timing = collector.last_timing().unwrap();
        assert_eq!(timing.sources.len(), 2);
        assert_eq!(timing.sources[1].0, SourceAddress::parse("fixture").unwrap());
    }

    #[test]
    fn test_format_override() {
        let metric = ConfiguredMetric::new(registry::resolve("MemoryFree").unwrap())
            .with_format(RawFormat::Integer);
        assert_eq!(metric.format(), RawFormat::Integer);

        let mut collector =
            Collector::new().with_source(fixture(&[("MemoryFree", "2048")]), vec![metric]);
        let outcomes = collector.collect_pass();

        assert_eq!(
            outcomes[0].event.properties()[0].value(),
            &PropertyValue::Integer(2048)
        );
    }

    #[test]
    fn test_source_without_metrics_yields_empty_event() {
        let mut collector = Collector::new().with_source(fixture(&[]), Vec::new());
        let outcomes = collector.collect_pass();
        assert!(outcomes[0].event.properties().is_empty());
        assert!(outcomes[0].is_complete());
    }
}
