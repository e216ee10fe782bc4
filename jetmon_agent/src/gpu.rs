// gpu.rs
use gfxinfo::active_gpu;
use nvml_wrapper::bitmasks::device::ThrottleReasons;
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Nvml;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::format::BYTES_PER_MB;
use crate::sample::GpuReading;

// NVML is initialised once; None means no NVIDIA driver / no device.
fn nvml() -> Option<&'static Nvml> {
    static NVML: OnceCell<Option<Nvml>> = OnceCell::new();
    NVML.get_or_init(|| match Nvml::init() {
        Ok(n) => match n.device_count() {
            Ok(c) if c > 0 => {
                info!("found {c} NVIDIA GPU(s)");
                Some(n)
            }
            Ok(_) => {
                info!("no NVIDIA GPUs found");
                None
            }
            Err(e) => {
                warn!("NVML device count failed: {e}");
                None
            }
        },
        Err(e) => {
            info!("NVML initialization failed: {e}");
            None
        }
    })
    .as_ref()
}

/// First NVIDIA device via NVML. Optional sensors that the board lacks are
/// left empty; only a failing device handle is reported as an error.
pub fn collect_nvidia() -> Option<GpuReading> {
    let nvml = nvml()?;
    let dev = match nvml.device_by_index(0) {
        Ok(d) => d,
        Err(e) => {
            warn!("GPU metrics error: {e}");
            return Some(GpuReading::failed(format!("Failed to get GPU metrics: {e}")));
        }
    };
    let mem = dev.memory_info().ok();
    Some(GpuReading {
        utilization: dev.utilization_rates().ok().map(|u| u.gpu as f64),
        temp_c: dev.temperature(TemperatureSensor::Gpu).ok().map(|t| t as f64),
        power_mw: dev.power_usage().ok().map(|p| p as f64),
        total_power_mw: None,
        mem_used_mb: mem.as_ref().map(|m| m.used as f64 / BYTES_PER_MB),
        mem_total_mb: mem.as_ref().map(|m| m.total as f64 / BYTES_PER_MB),
        ..GpuReading::default()
    })
}

pub fn nvidia_thermal_throttled() -> Option<bool> {
    let dev = nvml()?.device_by_index(0).ok()?;
    let reasons = dev.current_throttle_reasons().ok()?;
    Some(reasons.intersects(
        ThrottleReasons::SW_THERMAL_SLOWDOWN | ThrottleReasons::HW_THERMAL_SLOWDOWN,
    ))
}

/// NVML first, then gfxinfo. Once gfxinfo has failed it is not probed again.
pub fn collect() -> GpuReading {
    static GENERIC_MISSING: AtomicBool = AtomicBool::new(false);
    if let Some(g) = collect_nvidia() {
        return g;
    }
    if !GENERIC_MISSING.load(Ordering::Relaxed) {
        match collect_generic() {
            Ok(g) => return g,
            Err(e) => {
                info!("no GPU via gfxinfo: {e}");
                GENERIC_MISSING.store(true, Ordering::Relaxed);
            }
        }
    }
    GpuReading::failed("No GPU detected")
}

/// Vendor-neutral fallback (AMD/Intel) through gfxinfo: load and VRAM only.
pub fn collect_generic() -> Result<GpuReading, Box<dyn std::error::Error>> {
    let gpu = active_gpu()?;
    let info = gpu.info();
    Ok(GpuReading {
        utilization: Some(info.load_pct() as f64),
        mem_used_mb: Some(info.used_vram() as f64 / BYTES_PER_MB),
        mem_total_mb: Some(info.total_vram() as f64 / BYTES_PER_MB),
        ..GpuReading::default()
    })
}
