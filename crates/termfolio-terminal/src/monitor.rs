//! Host resource sampling for the `system` command.
//!
//! [`SystemMonitor`] is the seam. [`ProcMonitor`] reads Linux `/proc` and
//! `df`; any figure it cannot read is reported as unknown rather than failing
//! the whole sample.

use std::fs;
use std::process::Command as Process;
use std::thread;

use termfolio_types::error::Result;

/// One reading of host load. Percentages are 0-100; `None` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStats {
    pub cpu: Option<u8>,
    pub memory: Option<u8>,
    pub disk: Option<u8>,
}

/// Source of [`SystemStats`] snapshots.
pub trait SystemMonitor: Send + Sync {
    fn sample(&self) -> Result<SystemStats>;
}

/// Samples the local machine through `/proc/loadavg`, `/proc/meminfo` and
/// `df -P /`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcMonitor;

impl SystemMonitor for ProcMonitor {
    fn sample(&self) -> Result<SystemStats> {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        let cpu = fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|s| cpu_percent(&s, cores));
        let memory = fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|s| memory_percent(&s));
        let disk = Process::new("df")
            .args(["-P", "/"])
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| disk_percent(&String::from_utf8_lossy(&out.stdout)));
        log::debug!("Sampled system stats: cpu={cpu:?} mem={memory:?} disk={disk:?}");
        Ok(SystemStats { cpu, memory, disk })
    }
}

/// One-minute load average as a share of the available cores.
fn cpu_percent(loadavg: &str, cores: usize) -> Option<u8> {
    let load: f64 = loadavg.split_whitespace().next()?.parse().ok()?;
    let pct = load / cores.max(1) as f64 * 100.0;
    Some(pct.round().clamp(0.0, 100.0) as u8)
}

/// `MemTotal` minus `MemAvailable`, as a share of `MemTotal`.
fn memory_percent(meminfo: &str) -> Option<u8> {
    let field = |key: &str| -> Option<u64> {
        meminfo
            .lines()
            .find(|line| line.starts_with(key))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };
    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some((used * 100 / total).min(100) as u8)
}

/// The capacity column of the last `df -P` row, e.g. `42%`.
fn disk_percent(df: &str) -> Option<u8> {
    df.lines()
        .skip(1)
        .last()?
        .split_whitespace()
        .find_map(|col| col.strip_suffix('%'))?
        .parse::<u8>()
        .ok()
        .map(|pct| pct.min(100))
}
