//! Types that mirror the agent's JSON schema.
//!
//! Every struct defaults missing fields so an older or partial agent still
//! decodes; absent sensors read as `None` and are displayed as 0.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Network {
    // cumulative totals
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub bytes_sent_human: String,
    pub bytes_recv_human: String,
    // bytes/second
    pub sent_speed: f64,
    pub recv_speed: f64,
    pub sent_speed_human: String,
    pub recv_speed_human: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GpuMetrics {
    pub gpu_utilization: Option<f64>,
    pub gpu_temperature: Option<f64>,
    pub cpu_temperature: Option<f64>,
    // milliwatts
    pub total_power: Option<f64>,
    pub gpu_power: Option<f64>,
    pub gpu_memory_percent: Option<f64>,
    // MB
    pub gpu_memory_used: Option<f64>,
    pub gpu_memory_total: Option<f64>,
    // Jetson unified memory, MB
    pub ram_used: Option<f64>,
    pub ram_total: Option<f64>,
    pub ram_percent: Option<f64>,
    pub cpu_cores: Vec<CpuCore>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct CpuCore {
    pub usage: f64,
    // MHz
    pub frequency: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Platform {
    pub system: String,
    pub machine: String,
    pub is_jetson: bool,
    pub hostname: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Swap {
    pub percent: f64,
    pub used: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Memory {
    pub available: f64,
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MemoryPressure {
    pub memory_pressure: f64,
    pub swap: Swap,
    pub memory: Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThermalState {
    Normal,
    Throttled,
    Error,
    // serde(other) must sit on the last variant
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Thermal {
    pub status: ThermalState,
    pub cpu_throttled: bool,
    pub gpu_throttled: bool,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Snapshot {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime: String,
    pub uptime_seconds: u64,
    pub network: Network,
    pub gpu_metrics: GpuMetrics,
    pub platform: Platform,
    pub memory_pressure: MemoryPressure,
    pub thermal_status: Thermal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_agent_payload() {
        let js = r#"{
            "timestamp": "2024-01-02 03:04:05",
            "cpu_percent": 25.5, "memory_percent": 60.0, "disk_percent": 45.0,
            "uptime": "0h 6m 1s", "uptime_seconds": 361,
            "network": {"bytes_sent": 1000, "bytes_recv": 2000,
                        "bytes_sent_human": "1000 B", "bytes_recv_human": "2.0 KB",
                        "sent_speed": 500.0, "recv_speed": 1000.0,
                        "sent_speed_human": "0.5 KB/s", "recv_speed_human": "1.0 KB/s"},
            "gpu_metrics": {"gpu_utilization": 75.0, "total_power": 5000.0,
                            "ram_used": 2048.0, "ram_total": 8192.0, "ram_percent": 25.0,
                            "cpu_cores": [{"usage": 25.0, "frequency": 1479.0}, {"usage": 50.0, "frequency": 1479.0}]},
            "platform": {"system": "Linux", "machine": "aarch64", "is_jetson": true, "hostname": "orin"},
            "memory_pressure": {"memory_pressure": 65.0,
                                "swap": {"percent": 50.0, "used": 512.0, "total": 1024.0},
                                "memory": {"available": 2000.0, "total": 10000.0, "percent": 80.0}},
            "thermal_status": {"status": "Throttled", "cpu_throttled": true, "gpu_throttled": false}
        }"#;
        let s: Snapshot = serde_json::from_str(js).unwrap();
        assert_eq!(s.memory_pressure.memory_pressure, 65.0);
        assert_eq!(s.memory_pressure.swap.percent, 50.0);
        assert_eq!(s.thermal_status.status, ThermalState::Throttled);
        assert_eq!(s.gpu_metrics.gpu_utilization, Some(75.0));
        assert_eq!(s.gpu_metrics.gpu_temperature, None);
        assert_eq!(s.gpu_metrics.ram_percent, Some(25.0));
        assert_eq!(s.gpu_metrics.cpu_cores.len(), 2);
        assert_eq!(s.gpu_metrics.cpu_cores[0].frequency, 1479.0);
        assert_eq!(s.network.recv_speed, 1000.0);
        assert!(s.platform.is_jetson);
    }

    #[test]
    fn missing_sections_default() {
        let s: Snapshot = serde_json::from_str(r#"{"cpu_percent": 3.0, "gpu_metrics": {"error": "No GPU detected"}}"#).unwrap();
        assert_eq!(s.cpu_percent, 3.0);
        assert_eq!(s.thermal_status.status, ThermalState::Unknown);
        assert_eq!(s.gpu_metrics.error.as_deref(), Some("No GPU detected"));
    }

    #[test]
    fn unrecognised_thermal_status_is_unknown() {
        let t: Thermal = serde_json::from_str(r#"{"status": "Melting"}"#).unwrap();
        assert_eq!(t.status, ThermalState::Unknown);
        let t: Thermal = serde_json::from_str(r#"{"status": "Error"}"#).unwrap();
        assert_eq!(t.status, ThermalState::Error);
    }
}
