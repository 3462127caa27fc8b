//! Parsers for `/proc` files.
//!
//! Pure functions over file content, easily testable with string inputs.

use crate::metric::ParseError;

/// Parsed data from `/proc/meminfo`, values in kB.
///
/// Fields absent on older kernels stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_total: Option<u64>,
    pub mem_free: Option<u64>,
    pub mem_available: Option<u64>,
    pub swap_total: Option<u64>,
    pub swap_free: Option<u64>,
}

/// Parses `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut info = MemInfo::default();

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut info.mem_total,
            "MemFree" => &mut info.mem_free,
            "MemAvailable" => &mut info.mem_available,
            "SwapTotal" => &mut info.swap_total,
            "SwapFree" => &mut info.swap_free,
            _ => continue,
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ParseError::new(format!("invalid meminfo line '{}'", line)))?;
        *slot = Some(value);
    }

    if info.mem_total.is_none() {
        return Err(ParseError::new("meminfo has no MemTotal"));
    }

    Ok(info)
}

/// CPU time counters from one `cpu` line of `/proc/stat`, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuStat {
    /// Sum of all accounted ticks. Guest time is already part of `user`.
    ///
    /// Saturates at `u64::MAX`; stats from [`parse_cpu_total`] never do.
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Sum of all accounted ticks, or `None` if it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        [
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .try_fold(self.user, u64::checked_add)
    }
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_total(content: &str) -> Result<CpuStat, ParseError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ParseError::new("missing aggregate cpu line in stat"))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|s| s.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| ParseError::new(format!("invalid cpu line '{}'", line)))?;

    if fields.len() < 4 {
        return Err(ParseError::new(format!(
            "not enough fields in cpu line: expected 4+, got {}",
            fields.len()
        )));
    }

    let get = |idx: usize| fields.get(idx).copied().unwrap_or(0);

    let stat = CpuStat {
        user: get(0),
        nice: get(1),
        system: get(2),
        idle: get(3),
        iowait: get(4),
        irq: get(5),
        softirq: get(6),
        steal: get(7),
    };
    if stat.checked_total().is_none() {
        return Err(ParseError::new(format!(
            "cpu counters overflow in line '{}'",
            line
        )));
    }
    Ok(stat)
}

/// Parsed data from `/proc/loadavg`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAvg {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub running: u32,
    pub total: u32,
}

/// Parses `/proc/loadavg` content.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::new("invalid loadavg format"));
    }

    let load1 = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid load1"))?;
    let load5 = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid load5"))?;
    let load15 = parts[2]
        .parse()
        .map_err(|_| ParseError::new("invalid load15"))?;

    // Format: running/total
    let (running, total) = parts[3]
        .split_once('/')
        .and_then(|(r, t)| Some((r.parse().ok()?, t.parse().ok()?)))
        .ok_or_else(|| ParseError::new("invalid running/total field"))?;

    Ok(LoadAvg {
        load1,
        load5,
        load15,
        running,
        total,
    })
}

/// Parses `/proc/uptime`, returning seconds since boot.
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    content
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::new("invalid uptime format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Cached:          2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
";
        let info = parse_meminfo(content).unwrap();

        assert_eq!(info.mem_total, Some(16384000));
        assert_eq!(info.mem_free, Some(8192000));
        assert_eq!(info.mem_available, Some(12000000));
        assert_eq!(info.swap_free, Some(4096000));
    }

    #[test]
    fn test_parse_meminfo_old_kernel() {
        let info = parse_meminfo("MemTotal: 1024 kB\nMemFree: 512 kB\n").unwrap();
        assert_eq!(info.mem_available, None);
        assert_eq!(info.swap_total, None);
    }

    #[test]
    fn test_parse_meminfo_errors() {
        assert!(parse_meminfo("MemFree: 512 kB\n").is_err());
        assert!(parse_meminfo("MemTotal: lots kB\n").is_err());
    }

    #[test]
    fn test_parse_cpu_total() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
ctxt 500000
";
        let cpu = parse_cpu_total(content).unwrap();

        assert_eq!(cpu.user, 10000);
        assert_eq!(cpu.nice, 500);
        assert_eq!(cpu.system, 3000);
        assert_eq!(cpu.idle, 80000);
        assert_eq!(cpu.iowait, 1000);
        assert_eq!(cpu.total(), 94800);
    }

    #[test]
    fn test_parse_cpu_total_short_line() {
        // Pre-2.6 kernels only report four counters.
        let cpu = parse_cpu_total("cpu 1 2 3 4\n").unwrap();
        assert_eq!(cpu.iowait, 0);
        assert_eq!(cpu.total(), 10);

        assert!(parse_cpu_total("cpu 1 2\n").is_err());
        assert!(parse_cpu_total("cpu0 1 2 3 4\n").is_err());
        assert!(parse_cpu_total("cpu 1 x 3 4\n").is_err());
    }

    #[test]
    fn test_parse_cpu_total_overflow() {
        let err = parse_cpu_total("cpu 18446744073709551615 1 0 0\n").unwrap_err();
        assert!(err.to_string().contains("overflow"));

        let huge = CpuStat {
            user: u64::MAX,
            idle: 1,
            ..Default::default()
        };
        assert_eq!(huge.checked_total(), None);
        assert_eq!(huge.total(), u64::MAX);
    }

    #[test]
    fn test_parse_loadavg() {
        let load = parse_loadavg("0.15 0.10 0.05 1/150 1234\n").unwrap();

        assert!((load.load1 - 0.15).abs() < 0.001);
        assert!((load.load5 - 0.10).abs() < 0.001);
        assert!((load.load15 - 0.05).abs() < 0.001);
        assert_eq!(load.running, 1);
        assert_eq!(load.total, 150);

        assert!(parse_loadavg("0.15 0.10\n").is_err());
        assert!(parse_loadavg("0.15 0.10 0.05 150 1234\n").is_err());
    }

    #[test]
    fn test_parse_uptime() {
        assert!((parse_uptime("12345.67 98765.43\n").unwrap() - 12345.67).abs() < 0.001);
        assert!(parse_uptime("").is_err());
    }
}
