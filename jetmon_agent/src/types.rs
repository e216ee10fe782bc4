//! Snapshot served on `GET /metrics`.
//! Keep this module minimal and stable — it defines the wire format.

use serde::Serialize;

use crate::derive::{DerivedSample, ThermalStatus};
use crate::format::{format_bytes, format_speed, format_timestamp, format_uptime};
use crate::sample::{CpuCore, RawSample};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NetworkInfo {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub bytes_sent_human: String,
    pub bytes_recv_human: String,
    // bytes per second since the previous sample
    pub sent_speed: f64,
    pub recv_speed: f64,
    pub sent_speed_human: String,
    pub recv_speed_human: String,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct GpuMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_temperature: Option<f64>,
    // milliwatts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_memory_percent: Option<f64>,
    // MB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_memory_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_memory_total: Option<f64>,
    // Jetson unified memory, MB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_percent: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cpu_cores: Vec<CpuCore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PlatformInfo {
    pub system: String,
    pub machine: String,
    pub is_jetson: bool,
    pub hostname: String,
}

impl PlatformInfo {
    pub fn detect(is_jetson: bool) -> Self {
        let system = match std::env::consts::OS {
            "linux" => "Linux".to_string(),
            "macos" => "Darwin".to_string(),
            "windows" => "Windows".to_string(),
            other => other.to_string(),
        };
        let hostname = hostname::get()
            .ok()
            .and_then(|s| s.into_string().ok())
            .unwrap_or_else(|| "unknown".into());
        Self {
            system,
            machine: std::env::consts::ARCH.to_string(),
            is_jetson,
            hostname,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SwapInfo {
    pub percent: f64,
    // MB
    pub used: f64,
    pub total: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MemoryInfo {
    // MB
    pub available: f64,
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MemoryPressure {
    pub memory_pressure: f64,
    pub swap: SwapInfo,
    pub memory: MemoryInfo,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ThermalInfo {
    pub status: ThermalStatus,
    pub cpu_throttled: bool,
    pub gpu_throttled: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime: String,
    pub uptime_seconds: u64,
    pub network: NetworkInfo,
    pub gpu_metrics: GpuMetrics,
    pub platform: PlatformInfo,
    pub memory_pressure: MemoryPressure,
    pub thermal_status: ThermalInfo,
}

impl Snapshot {
    pub fn new(raw: &RawSample, derived: &DerivedSample, platform: &PlatformInfo) -> Self {
        let gpu = &raw.gpu;
        Self {
            timestamp: format_timestamp(raw.timestamp),
            cpu_percent: raw.cpu_percent,
            memory_percent: raw.memory_percent,
            disk_percent: raw.disk_percent,
            uptime: format_uptime(raw.uptime_seconds),
            uptime_seconds: raw.uptime_seconds,
            network: NetworkInfo {
                bytes_sent: raw.net_bytes_sent,
                bytes_recv: raw.net_bytes_recv,
                bytes_sent_human: format_bytes(raw.net_bytes_sent),
                bytes_recv_human: format_bytes(raw.net_bytes_recv),
                sent_speed: raw.net_sent_bps,
                recv_speed: raw.net_recv_bps,
                sent_speed_human: format_speed(raw.net_sent_bps),
                recv_speed_human: format_speed(raw.net_recv_bps),
            },
            gpu_metrics: GpuMetrics {
                gpu_utilization: gpu.utilization,
                gpu_temperature: gpu.temp_c,
                cpu_temperature: raw.cpu_temp_c,
                total_power: gpu.total_power_mw,
                gpu_power: gpu.power_mw,
                gpu_memory_percent: gpu.mem_percent(),
                gpu_memory_used: gpu.mem_used_mb,
                gpu_memory_total: gpu.mem_total_mb,
                ram_used: gpu.ram_used_mb,
                ram_total: gpu.ram_total_mb,
                ram_percent: gpu.ram_percent(),
                cpu_cores: gpu.cpu_cores.clone(),
                error: gpu.error.clone(),
            },
            platform: platform.clone(),
            memory_pressure: MemoryPressure {
                memory_pressure: derived.memory_pressure_score,
                swap: SwapInfo {
                    percent: derived.swap_percent,
                    used: raw.swap_used_mb,
                    total: raw.swap_total_mb,
                },
                memory: MemoryInfo {
                    available: raw.memory_available_mb,
                    total: raw.memory_total_mb,
                    percent: raw.memory_percent,
                },
            },
            thermal_status: ThermalInfo {
                status: derived.thermal_status,
                cpu_throttled: raw.throttle.cpu.unwrap_or(false),
                gpu_throttled: raw.throttle.gpu.unwrap_or(false),
            },
        }
    }
}
