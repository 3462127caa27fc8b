//! YAML run configuration.
//!
//! ```yaml
//! interval_secs: 10
//! metrics: [CpuUserTime, LoadAverageLastMinute]
//! sources:
//!   - address: host-1
//!     kind: procfs
//!     proc_path: /proc
//!   - address: lab-fixture
//!     kind: static
//!     values: { CpuUserTime: "12.5", MemoryFree: 2048 }
//!     metrics:
//!       - CpuUserTime
//!       - { id: MemoryFree, format: integer }
//! ```
//!
//! Sources without their own `metrics` list use the top-level one; when that
//! is absent too, every registered metric is collected. Metric identifiers are
//! resolved against the registry before any collection starts.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::collector::{Collector, ConfiguredMetric, FileSystem, ProcfsSource, StaticSource};
use crate::event::{InvalidArgumentError, SourceAddress};
use crate::metric::{RawFormat, UnknownMetricError, registry};

pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Configuration failures. All of them are caused by user input.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    UnknownMetric(#[from] UnknownMetricError),
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_proc_path() -> String {
    DEFAULT_PROC_PATH.to_string()
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Default metric list for sources without their own.
    #[serde(default)]
    pub metrics: Vec<MetricEntry>,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SourceEntry")]
pub struct SourceConfig {
    pub address: String,
    pub kind: SourceKind,
    pub metrics: Option<Vec<MetricEntry>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// Reads a procfs mount.
    Procfs { proc_path: String },
    /// Serves canned raw values keyed by metric identifier.
    Static {
        values: BTreeMap<String, ScalarValue>,
    },
}

/// On-disk shape of a source entry; each kind accepts only its own keys.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
enum SourceEntry {
    Procfs {
        address: String,
        #[serde(default = "default_proc_path")]
        proc_path: String,
        #[serde(default)]
        metrics: Option<Vec<MetricEntry>>,
    },
    Static {
        address: String,
        #[serde(default)]
        values: BTreeMap<String, ScalarValue>,
        #[serde(default)]
        metrics: Option<Vec<MetricEntry>>,
    },
}

impl From<SourceEntry> for SourceConfig {
    fn from(entry: SourceEntry) -> Self {
        match entry {
            SourceEntry::Procfs {
                address,
                proc_path,
                metrics,
            } => SourceConfig {
                address,
                kind: SourceKind::Procfs { proc_path },
                metrics,
            },
            SourceEntry::Static {
                address,
                values,
                metrics,
            } => SourceConfig {
                address,
                kind: SourceKind::Static { values },
                metrics,
            },
        }
    }
}

/// A YAML scalar used as a canned raw sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

/// A metric reference: a bare identifier or an identifier with a format override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        format: Option<RawFormat>,
    },
}

impl MetricEntry {
    pub fn id(&self) -> &str {
        match self {
            MetricEntry::Id(id) | MetricEntry::Detailed { id, .. } => id,
        }
    }

    fn resolve(&self) -> Result<ConfiguredMetric, UnknownMetricError> {
        let metric = ConfiguredMetric::new(registry::resolve(self.id())?);
        Ok(match self {
            MetricEntry::Detailed {
                format: Some(format),
                ..
            } => metric.with_format(*format),
            _ => metric,
        })
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Single procfs source collecting every registered metric.
    pub fn local(address: impl Into<String>, proc_path: impl Into<String>) -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            metrics: Vec::new(),
            sources: vec![SourceConfig {
                address: address.into(),
                kind: SourceKind::Procfs {
                    proc_path: proc_path.into(),
                },
                metrics: None,
            }],
        }
    }

    /// Validates the configuration and resolves every metric identifier.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one source must be configured".to_string(),
            ));
        }

        let mut addresses = HashSet::new();
        let mut sources = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let address = SourceAddress::parse(&source.address)?;
            if !addresses.insert(address.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source address '{}'",
                    address
                )));
            }

            let metrics = match &source.metrics {
                Some(entries) if entries.is_empty() => {
                    return Err(ConfigError::Invalid(format!(
                        "source '{}' lists no metrics",
                        address
                    )));
                }
                Some(entries) => resolve_entries(&address, entries)?,
                None if self.metrics.is_empty() => registry::all()
                    .into_iter()
                    .map(ConfiguredMetric::new)
                    .collect(),
                None => resolve_entries(&address, &self.metrics)?,
            };

            if let SourceKind::Static { values } = &source.kind {
                for id in values.keys() {
                    registry::resolve(id)?;
                }
            }

            sources.push(ResolvedSource {
                address,
                kind: source.kind.clone(),
                metrics,
            });
        }

        Ok(ResolvedConfig {
            interval: Duration::from_secs(self.interval_secs),
            sources,
        })
    }
}

fn resolve_entries(
    address: &SourceAddress,
    entries: &[MetricEntry],
) -> Result<Vec<ConfiguredMetric>, ConfigError> {
    let mut seen = HashSet::new();
    let mut metrics = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id()) {
            return Err(ConfigError::Invalid(format!(
                "metric '{}' listed twice for source '{}'",
                entry.id(),
                address
            )));
        }
        metrics.push(entry.resolve()?);
    }
    Ok(metrics)
}

/// A validated source with its resolved metric list.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub address: SourceAddress,
    pub kind: SourceKind,
    pub metrics: Vec<ConfiguredMetric>,
}

/// Configuration ready to drive a [`Collector`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub interval: Duration,
    pub sources: Vec<ResolvedSource>,
}

impl ResolvedConfig {
    /// Builds a collector; procfs sources read through `fs`.
    pub fn into_collector<F>(self, fs: F) -> Collector
    where
        F: FileSystem + Clone + 'static,
    {
        let mut collector = Collector::new();
        for source in self.sources {
            match source.kind {
                SourceKind::Procfs { proc_path } => {
                    let procfs = ProcfsSource::new(source.address, fs.clone(), &proc_path);
                    if !procfs.is_available() {
                        warn!("No procfs found at {}, its metrics will fail", proc_path);
                    }
                    collector.add_source(procfs, source.metrics);
                }
                SourceKind::Static { values } => {
                    let values = values
                        .into_iter()
                        .map(|(id, value)| (id, value.to_string()))
                        .collect();
                    collector.add_source(
                        StaticSource::new(source.address, values),
                        source.metrics,
                    )
                }
            }
        }
        collector
    }
}
