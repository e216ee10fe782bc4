//! Metrics collection using sysinfo, NVML and tegrastats for jetmon_agent.

use std::path::Path;
use std::time::Instant;

use sysinfo::{Components, Disks};
use tracing::warn;

use crate::config::{gpu_enabled, temp_enabled};
use crate::derive::compute;
use crate::format::{now, BYTES_PER_MB};
use crate::gpu;
use crate::sample::{GpuReading, RawSample, ThrottleFlags};
use crate::state::AppState;
use crate::tegrastats;
use crate::thermal;
use crate::types::Snapshot;

/// Turns cumulative interface counters into bytes/second. The first update
/// has nothing to diff against and reports zero.
#[derive(Debug, Default)]
pub struct NetRate {
    last: Option<(u64, u64, Instant)>,
}

impl NetRate {
    pub fn update(&mut self, sent: u64, recv: u64, at: Instant) -> (f64, f64) {
        let rates = match self.last {
            Some((prev_sent, prev_recv, prev_at)) => {
                let dt = at.saturating_duration_since(prev_at).as_secs_f64();
                if dt > 0.0 {
                    (
                        sent.saturating_sub(prev_sent) as f64 / dt,
                        recv.saturating_sub(prev_recv) as f64 / dt,
                    )
                } else {
                    (0.0, 0.0)
                }
            }
            None => (0.0, 0.0),
        };
        self.last = Some((sent, recv, at));
        rates
    }
}

fn used_percent(total: u64, available: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    total.saturating_sub(available) as f64 / total as f64 * 100.0
}

// Root filesystem usage; falls back to the first listed disk.
fn root_disk_percent(disks: &Disks) -> f64 {
    let list = disks.list();
    let root = list
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| list.first());
    root.map(|d| used_percent(d.total_space(), d.available_space()))
        .unwrap_or(0.0)
}

fn best_cpu_temp(components: &Components) -> Option<f64> {
    components
        .iter()
        .filter(|c| {
            let label = c.label().to_ascii_lowercase();
            label.contains("cpu")
                || label.contains("package")
                || label.contains("tctl")
                || label.contains("tdie")
        })
        .filter_map(|c| c.temperature())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|t| t as f64)
}

struct PlatformProbe {
    gpu: GpuReading,
    cpu_temp_c: Option<f64>,
    throttle: ThrottleFlags,
}

async fn probe_jetson() -> PlatformProbe {
    match tegrastats::read_line().await {
        Ok(line) => PlatformProbe {
            gpu: tegrastats::gpu_reading_from_line(&line),
            cpu_temp_c: tegrastats::cpu_temp_from_line(&line),
            throttle: thermal::flags_from_tegrastats(&line),
        },
        Err(e) => {
            warn!("tegrastats failed: {e:#}");
            PlatformProbe {
                gpu: GpuReading::failed("Failed to get GPU metrics"),
                cpu_temp_c: None,
                throttle: ThrottleFlags::failed(),
            }
        }
    }
}

fn probe_generic() -> PlatformProbe {
    let (gpu, gpu_throttled) = if gpu_enabled() {
        (gpu::collect(), gpu::nvidia_thermal_throttled())
    } else {
        (GpuReading::default(), None)
    };
    let cpu = thermal::read_cpu_throttle(Path::new(thermal::CPU_THROTTLE_COUNT));
    PlatformProbe {
        gpu,
        cpu_temp_c: None,
        throttle: thermal::with_gpu_flag(cpu, gpu_throttled),
    }
}

pub async fn collect_raw(state: &AppState) -> RawSample {
    let probe = if state.platform.is_jetson {
        probe_jetson().await
    } else {
        probe_generic()
    };

    let (cpu_percent, mem_total, mem_avail, swap_total, swap_used) = {
        let mut sys = state.sys.lock().await;
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        (
            sys.global_cpu_usage() as f64,
            sys.total_memory(),
            sys.available_memory(),
            sys.total_swap(),
            sys.used_swap(),
        )
    };

    let disk_percent = {
        let mut disks = state.disks.lock().await;
        disks.refresh(false);
        root_disk_percent(&disks)
    };

    let cpu_temp_c = match probe.cpu_temp_c {
        Some(t) => Some(t),
        None if temp_enabled() => {
            let mut components = state.components.lock().await;
            components.refresh(false);
            best_cpu_temp(&components)
        }
        None => None,
    };

    let (bytes_sent, bytes_recv) = {
        let mut nets = state.networks.lock().await;
        nets.refresh(true);
        nets.iter().fold((0u64, 0u64), |(tx, rx), (_, data)| {
            (
                tx.saturating_add(data.total_transmitted()),
                rx.saturating_add(data.total_received()),
            )
        })
    };
    let (sent_bps, recv_bps) = state
        .net_rate
        .lock()
        .await
        .update(bytes_sent, bytes_recv, Instant::now());

    RawSample {
        cpu_percent,
        memory_percent: used_percent(mem_total, mem_avail),
        memory_available_mb: mem_avail as f64 / BYTES_PER_MB,
        memory_total_mb: mem_total as f64 / BYTES_PER_MB,
        swap_used_mb: swap_used as f64 / BYTES_PER_MB,
        swap_total_mb: swap_total as f64 / BYTES_PER_MB,
        disk_percent,
        net_sent_bps: sent_bps,
        net_recv_bps: recv_bps,
        net_bytes_sent: bytes_sent,
        net_bytes_recv: bytes_recv,
        gpu: probe.gpu,
        cpu_temp_c,
        throttle: probe.throttle,
        uptime_seconds: sysinfo::System::uptime(),
        timestamp: now(),
    }
}

pub async fn collect_snapshot(state: &AppState) -> Snapshot {
    let raw = collect_raw(state).await;
    let derived = compute(&raw);
    Snapshot::new(&raw, &derived, &state.platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_rate_is_zero() {
        let mut r = NetRate::default();
        assert_eq!(r.update(1000, 2000, Instant::now()), (0.0, 0.0));
    }

    #[test]
    fn rate_is_delta_over_elapsed() {
        let mut r = NetRate::default();
        let t0 = Instant::now();
        r.update(1000, 2000, t0);
        let (tx, rx) = r.update(2000, 4000, t0 + Duration::from_secs(2));
        assert_eq!(tx, 500.0);
        assert_eq!(rx, 1000.0);
    }

    #[test]
    fn counter_reset_does_not_go_negative() {
        let mut r = NetRate::default();
        let t0 = Instant::now();
        r.update(5000, 5000, t0);
        let (tx, rx) = r.update(10, 10, t0 + Duration::from_secs(1));
        assert_eq!((tx, rx), (0.0, 0.0));
    }

    #[test]
    fn used_percent_handles_empty_total() {
        assert_eq!(used_percent(0, 0), 0.0);
        assert_eq!(used_percent(200, 50), 75.0);
    }
}
