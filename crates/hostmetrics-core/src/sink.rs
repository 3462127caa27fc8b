//! Downstream consumers of pass outcomes.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::collector::PassOutcome;

/// Receives every outcome produced by a collection pass.
pub trait EventSink {
    fn emit(&mut self, outcome: &PassOutcome) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one JSON object per outcome and line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, outcome: &PassOutcome) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, outcome)?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Logs a one-line summary per outcome and a warning per failed metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, outcome: &PassOutcome) -> io::Result<()> {
        info!("{}", describe_outcome(outcome));
        for failure in &outcome.failures {
            warn!(
                "{}: {} unavailable: {}",
                outcome.event.source_address(),
                failure.metric,
                failure.reason
            );
        }
        Ok(())
    }
}

/// Describes an outcome for logging.
pub fn describe_outcome(outcome: &PassOutcome) -> String {
    let event = &outcome.event;
    let properties: Vec<String> = event.properties().iter().map(|p| p.to_string()).collect();

    let mut line = format!("{}: {}", event.source_address(), properties.join(", "));
    if properties.is_empty() {
        line.push_str("no properties");
    }
    if !outcome.failures.is_empty() {
        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.metric.as_str()).collect();
        line.push_str(&format!(" ({} failed: {})", failed.len(), failed.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{FailureKind, MetricFailure};
    use crate::event::ReadingEvent;
    use crate::metric::Property;

    fn outcome() -> PassOutcome {
        PassOutcome {
            event: ReadingEvent::try_new(
                "host-1",
                vec![Property::new("A", "A value"), Property::new("B", 2)],
            )
            .unwrap(),
            failures: vec![MetricFailure {
                metric: "Uptime".to_string(),
                kind: FailureKind::Source,
                reason: "no value for metric Uptime".to_string(),
            }],
        }
    }

    #[test]
    fn test_describe_outcome() {
        assert_eq!(
            describe_outcome(&outcome()),
            "host-1: A=A value, B=2 (1 failed: Uptime)"
        );

        let empty = PassOutcome {
            event: ReadingEvent::try_new("host-2", Vec::new()).unwrap(),
            failures: Vec::new(),
        };
        assert_eq!(describe_outcome(&empty), "host-2: no properties");
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&outcome()).unwrap();
        sink.emit(&outcome()).unwrap();
        sink.flush().unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["event"]["source_address"], "host-1");
        assert_eq!(value["event"]["properties"][0]["name"], "A");
        assert_eq!(value["event"]["properties"][1]["value"]["kind"], "integer");
        assert_eq!(value["event"]["properties"][1]["value"]["value"], 2);
        assert_eq!(value["failures"][0]["kind"], "source");
        assert!(value["event"]["timestamp"].is_string());
    }

    #[test]
    fn test_log_sink_never_fails() {
        assert!(LogSink.emit(&outcome()).is_ok());
    }
}
