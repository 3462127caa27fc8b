//! Source reading host metrics from procfs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::trace;

use crate::collector::procfs::parser::{
    CpuStat, MemInfo, parse_cpu_total, parse_loadavg, parse_meminfo, parse_uptime,
};
use crate::collector::source::{MetricSource, SourceError};
use crate::collector::traits::FileSystem;
use crate::event::SourceAddress;
use crate::metric::{MetricDefinition, ParseError};

/// CPU time shares over one sampling interval, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CpuShares {
    user: f64,
    system: f64,
    idle: f64,
    iowait: f64,
}

impl CpuShares {
    fn between(previous: &CpuStat, current: &CpuStat) -> Self {
        // Counters only go backwards when the host rebooted under us.
        let baseline = if current.total() < previous.total() {
            CpuStat::default()
        } else {
            *previous
        };

        let total = current.total() - baseline.total();
        if total == 0 {
            return Self::default();
        }

        let share =
            |now: u64, before: u64| now.saturating_sub(before) as f64 * 100.0 / total as f64;
        Self {
            user: share(current.user, baseline.user),
            system: share(
                current
                    .system
                    .saturating_add(current.irq)
                    .saturating_add(current.softirq),
                baseline
                    .system
                    .saturating_add(baseline.irq)
                    .saturating_add(baseline.softirq),
            ),
            idle: share(current.idle, baseline.idle),
            iowait: share(current.iowait, baseline.iowait),
        }
    }
}

/// Reads `stat`, `loadavg`, `meminfo` and `uptime` under a procfs mount.
///
/// Each file is read at most once per pass. CPU shares cover the interval
/// since the previous pass; the first pass reports shares since boot.
pub struct ProcfsSource<F: FileSystem> {
    address: SourceAddress,
    fs: F,
    proc_path: String,
    files: HashMap<&'static str, String>,
    previous_cpu: Option<CpuStat>,
    cpu_shares: Option<CpuShares>,
}

impl<F: FileSystem> ProcfsSource<F> {
    /// Creates a new procfs source.
    ///
    /// # Arguments
    /// * `address` - Identity stamped on the events of this source
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(address: SourceAddress, fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            address,
            fs,
            proc_path: proc_path.into(),
            files: HashMap::new(),
            previous_cpu: None,
            cpu_shares: None,
        }
    }

    /// Whether the procfs mount looks usable.
    pub fn is_available(&self) -> bool {
        self.fs.exists(Path::new(&format!("{}/stat", self.proc_path)))
    }

    fn parse_file<T>(
        &mut self,
        name: &'static str,
        parse: impl FnOnce(&str) -> Result<T, ParseError>,
    ) -> Result<T, SourceError> {
        let path = format!("{}/{}", self.proc_path, name);
        let content = match self.files.entry(name) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                trace!("reading {}", path);
                let content = self
                    .fs
                    .read_to_string(Path::new(&path))
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })?;
                e.insert(content)
            }
        };
        parse(content).map_err(|source| SourceError::Malformed { path, source })
    }

    fn cpu_shares(&mut self) -> Result<CpuShares, SourceError> {
        if let Some(shares) = self.cpu_shares {
            return Ok(shares);
        }

        let current = self.parse_file("stat", parse_cpu_total)?;
        let previous = self.previous_cpu.unwrap_or_default();
        let shares = CpuShares::between(&previous, &current);
        self.previous_cpu = Some(current);
        self.cpu_shares = Some(shares);
        Ok(shares)
    }

    fn memory_kb(
        &mut self,
        id: &str,
        pick: impl FnOnce(&MemInfo) -> Option<u64>,
    ) -> Result<String, SourceError> {
        let info = self.parse_file("meminfo", parse_meminfo)?;
        pick(&info)
            .map(|kb| format!("{} kB", kb))
            .ok_or_else(|| SourceError::Missing(id.to_string()))
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}", value)
}

impl<F: FileSystem> MetricSource for ProcfsSource<F> {
    fn address(&self) -> &SourceAddress {
        &self.address
    }

    fn begin_pass(&mut self) {
        self.files.clear();
        self.cpu_shares = None;
    }

    fn read_raw(&mut self, definition: &dyn MetricDefinition) -> Result<String, SourceError> {
        let id = definition.id();
        match id {
            "CpuUserTime" => Ok(percent(self.cpu_shares()?.user)),
            "CpuSystemTime" => Ok(percent(self.cpu_shares()?.system)),
            "CpuIdleTime" => Ok(percent(self.cpu_shares()?.idle)),
            "CpuIoWaitTime" => Ok(percent(self.cpu_shares()?.iowait)),
            "LoadAverageLastMinute" => {
                Ok(self.parse_file("loadavg", parse_loadavg)?.load1.to_string())
            }
            "LoadAverageLastFiveMinutes" => {
                Ok(self.parse_file("loadavg", parse_loadavg)?.load5.to_string())
            }
            "LoadAverageLastFifteenMinutes" => {
                Ok(self.parse_file("loadavg", parse_loadavg)?.load15.to_string())
            }
            "ProcessCount" => Ok(self.parse_file("loadavg", parse_loadavg)?.total.to_string()),
            "MemoryTotal" => self.memory_kb(id, |m| m.mem_total),
            "MemoryFree" => self.memory_kb(id, |m| m.mem_free),
            "MemoryAvailable" => self.memory_kb(id, |m| m.mem_available),
            "SwapFree" => self.memory_kb(id, |m| m.swap_free),
            "Uptime" => Ok(format!("{:.2}", self.parse_file("uptime", parse_uptime)?)),
            _ => Err(SourceError::Unsupported(id.to_string())),
        }
    }
}
