//! Raw telemetry as read from the OS and vendor tools, before any derivation.

use serde::Serialize;
use time::OffsetDateTime;

/// One entry of the tegrastats `CPU [..]` list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuCore {
    pub usage: f64,
    // MHz
    pub frequency: f64,
}

/// GPU / SoC readings. Every field is optional: hosts without a GPU, or
/// without a power rail sensor, simply leave them empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpuReading {
    pub utilization: Option<f64>,
    pub temp_c: Option<f64>,
    pub power_mw: Option<f64>,
    pub total_power_mw: Option<f64>,
    pub mem_used_mb: Option<f64>,
    pub mem_total_mb: Option<f64>,
    // Jetson only: unified system RAM and per-core load from tegrastats
    pub ram_used_mb: Option<f64>,
    pub ram_total_mb: Option<f64>,
    pub cpu_cores: Vec<CpuCore>,
    // Set when a GPU was expected but the query failed.
    pub error: Option<String>,
}

impl GpuReading {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            error: Some(msg.into()),
            ..Self::default()
        }
    }

    pub fn mem_percent(&self) -> Option<f64> {
        match (self.mem_used_mb, self.mem_total_mb) {
            (Some(used), Some(total)) if total > 0.0 => Some(used / total * 100.0),
            _ => None,
        }
    }

    pub fn ram_percent(&self) -> Option<f64> {
        match (self.ram_used_mb, self.ram_total_mb) {
            (Some(used), Some(total)) if total > 0.0 => Some(used / total * 100.0),
            _ => None,
        }
    }
}

/// Throttle flags as reported by the platform probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrottleFlags {
    pub cpu: Option<bool>,
    pub gpu: Option<bool>,
    pub query_failed: bool,
}

impl ThrottleFlags {
    pub fn failed() -> Self {
        Self {
            cpu: None,
            gpu: None,
            query_failed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_available_mb: f64,
    pub memory_total_mb: f64,
    pub swap_used_mb: f64,
    pub swap_total_mb: f64,
    pub disk_percent: f64,
    pub net_sent_bps: f64,
    pub net_recv_bps: f64,
    // cumulative counters since boot
    pub net_bytes_sent: u64,
    pub net_bytes_recv: u64,
    pub gpu: GpuReading,
    pub cpu_temp_c: Option<f64>,
    pub throttle: ThrottleFlags,
    pub uptime_seconds: u64,
    pub timestamp: OffsetDateTime,
}

impl Default for RawSample {
    fn default() -> Self {
        Self {
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_available_mb: 0.0,
            memory_total_mb: 0.0,
            swap_used_mb: 0.0,
            swap_total_mb: 0.0,
            disk_percent: 0.0,
            net_sent_bps: 0.0,
            net_recv_bps: 0.0,
            net_bytes_sent: 0,
            net_bytes_recv: 0,
            gpu: GpuReading::default(),
            cpu_temp_c: None,
            throttle: ThrottleFlags::default(),
            uptime_seconds: 0,
            timestamp: OffsetDateTime::UNIX_EPOCH,
        }
    }
}
