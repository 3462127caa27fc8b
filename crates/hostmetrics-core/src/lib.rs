//! hostmetrics-core — shared library for the hostmetrics collector.
//!
//! Provides:
//! - `metric` — metric definitions, typed properties, the definition registry
//! - `event` — immutable timestamped reading events and source addresses
//! - `clock` — clock abstraction used to stamp events
//! - `collector` — raw-reading sources (procfs, static) and the collection pass
//! - `config` — YAML run configuration resolved against the registry
//! - `sink` — downstream consumers of collected events

pub mod clock;
pub mod collector;
pub mod config;
pub mod event;
pub mod metric;
pub mod sink;
