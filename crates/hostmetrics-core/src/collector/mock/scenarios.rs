//! Pre-built mock procfs states.

use super::filesystem::MockFs;

impl MockFs {
    /// An idle four-CPU host rooted at `/proc`.
    pub fn typical_host() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4000000 kB
Dirty:              1024 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        fs
    }

    /// Moves the `typical_host` CPU counters forward by 2000 ticks:
    /// 30% user, 10% system, 50% idle, 10% iowait.
    pub fn advance_busy_interval(&mut self) {
        self.add_file(
            "/proc/stat",
            "\
cpu  10600 500 3200 81000 1200 200 100 0 0 0
cpu0 2650 125 800 20250 300 50 25 0 0 0
cpu1 2650 125 800 20250 300 50 25 0 0 0
cpu2 2650 125 800 20250 300 50 25 0 0 0
cpu3 2650 125 800 20250 300 50 25 0 0 0
ctxt 510000
btime 1700000000
processes 10040
procs_running 3
procs_blocked 0
",
        );
        self.add_file("/proc/uptime", "12355.67 98803.43\n");
        self.add_file("/proc/loadavg", "0.40 0.15 0.06 3/152 1270\n");
    }
}
