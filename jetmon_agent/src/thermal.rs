//! Thermal throttling probes.
//!
//! Jetson boards report throttling inline in the `tegrastats` line. Elsewhere
//! the CPU side comes from the kernel's per-core throttle counter and the GPU
//! side, when an NVIDIA card is present, from NVML throttle reasons.

use std::io;
use std::path::Path;

use tracing::warn;

use crate::sample::ThrottleFlags;

pub const CPU_THROTTLE_COUNT: &str = "/sys/devices/system/cpu/cpu0/thermal_throttle/core_throttle_count";

pub fn flags_from_tegrastats(line: &str) -> ThrottleFlags {
    ThrottleFlags {
        cpu: Some(line.contains("CPU_THROTTLE")),
        gpu: Some(line.contains("GPU_THROTTLE")),
        query_failed: false,
    }
}

pub fn parse_throttle_count(s: &str) -> Option<bool> {
    s.trim().parse::<u64>().ok().map(|n| n > 0)
}

/// A missing counter file means the platform does not expose throttling
/// (flags absent); any other failure is a failed query.
pub fn read_cpu_throttle(path: &Path) -> ThrottleFlags {
    match std::fs::read_to_string(path) {
        Ok(s) => match parse_throttle_count(&s) {
            Some(v) => ThrottleFlags {
                cpu: Some(v),
                gpu: None,
                query_failed: false,
            },
            None => {
                warn!("unparsable throttle counter in {}: {s:?}", path.display());
                ThrottleFlags::failed()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => ThrottleFlags::default(),
        Err(e) => {
            warn!("thermal query failed for {}: {e}", path.display());
            ThrottleFlags::failed()
        }
    }
}

pub fn with_gpu_flag(mut flags: ThrottleFlags, gpu: Option<bool>) -> ThrottleFlags {
    if flags.gpu.is_none() {
        flags.gpu = gpu;
    }
    flags
}
