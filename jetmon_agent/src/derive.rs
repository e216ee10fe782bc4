//! Derived metrics: memory pressure score and thermal status classification.
//!
//! Everything here is a pure function of one [`RawSample`]; no state is kept
//! between calls, so the sampler can call it from any task without locking.

use serde::Serialize;

use crate::sample::{RawSample, ThrottleFlags};

pub const MEMORY_WEIGHT: f64 = 0.6;
pub const SWAP_WEIGHT: f64 = 0.3;
pub const AVAILABILITY_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThermalStatus {
    Normal,
    Throttled,
    Unknown,
    Error,
}

impl ThermalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ThermalStatus::Normal => "Normal",
            ThermalStatus::Throttled => "Throttled",
            ThermalStatus::Unknown => "Unknown",
            ThermalStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedSample {
    pub memory_pressure_score: f64,
    pub swap_percent: f64,
    pub thermal_status: ThermalStatus,
}

pub fn compute(raw: &RawSample) -> DerivedSample {
    let swap = swap_percent(raw.swap_used_mb, raw.swap_total_mb);
    let penalty = availability_penalty(
        raw.memory_available_mb,
        raw.memory_total_mb,
        raw.memory_percent,
    );
    DerivedSample {
        memory_pressure_score: memory_pressure_score(raw.memory_percent, swap, penalty),
        swap_percent: swap,
        thermal_status: classify_thermal(&raw.throttle),
    }
}

pub fn swap_percent(used_mb: f64, total_mb: f64) -> f64 {
    let total = finite(total_mb);
    if total <= 0.0 {
        return 0.0;
    }
    pct(finite(used_mb) / total * 100.0)
}

/// Share of memory that is NOT available, 0..=100. Falls back to the usage
/// percentage when the total is unknown.
pub fn availability_penalty(available_mb: f64, total_mb: f64, memory_percent: f64) -> f64 {
    let total = finite(total_mb);
    if total <= 0.0 {
        return pct(memory_percent);
    }
    pct(100.0 - finite(available_mb) / total * 100.0)
}

pub fn memory_pressure_score(memory_percent: f64, swap_percent: f64, penalty: f64) -> f64 {
    let score = MEMORY_WEIGHT * pct(memory_percent)
        + SWAP_WEIGHT * pct(swap_percent)
        + AVAILABILITY_WEIGHT * pct(penalty);
    pct(score)
}

// First match wins: failure, then missing flags, then any throttled flag.
pub fn classify_thermal(flags: &ThrottleFlags) -> ThermalStatus {
    if flags.query_failed {
        return ThermalStatus::Error;
    }
    match (flags.cpu, flags.gpu) {
        (None, None) => ThermalStatus::Unknown,
        (Some(true), _) | (_, Some(true)) => ThermalStatus::Throttled,
        _ => ThermalStatus::Normal,
    }
}

#[inline]
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[inline]
fn pct(v: f64) -> f64 {
    finite(v).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(mem_pct: f64, avail: f64, total: f64, swap_used: f64, swap_total: f64) -> RawSample {
        RawSample {
            memory_percent: mem_pct,
            memory_available_mb: avail,
            memory_total_mb: total,
            swap_used_mb: swap_used,
            swap_total_mb: swap_total,
            ..RawSample::default()
        }
    }

    #[test]
    fn weighted_score_for_reference_sample() {
        // 80% used, swap 512/1024, 20% of memory unavailable
        let d = compute(&raw(80.0, 8000.0, 10000.0, 512.0, 1024.0));
        assert!((d.swap_percent - 50.0).abs() < 1e-9);
        assert!((d.memory_pressure_score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn score_clamps_at_extremes() {
        let d = compute(&raw(100.0, 0.0, 4096.0, 2048.0, 2048.0));
        assert_eq!(d.memory_pressure_score, 100.0);
        assert_eq!(memory_pressure_score(250.0, 300.0, 400.0), 100.0);
        assert_eq!(memory_pressure_score(-5.0, -1.0, -3.0), 0.0);
    }

    #[test]
    fn score_stays_in_range_over_grid() {
        for m in (0..=100).step_by(10) {
            for s in (0..=100).step_by(10) {
                for p in (0..=100).step_by(10) {
                    let v = memory_pressure_score(m as f64, s as f64, p as f64);
                    assert!((0.0..=100.0).contains(&v), "m={m} s={s} p={p} -> {v}");
                }
            }
        }
    }

    #[test]
    fn no_swap_means_zero_swap_percent() {
        assert_eq!(swap_percent(0.0, 0.0), 0.0);
        assert_eq!(swap_percent(100.0, 0.0), 0.0);
        let d = compute(&raw(50.0, 5000.0, 10000.0, 0.0, 0.0));
        assert_eq!(d.swap_percent, 0.0);
        assert!((d.memory_pressure_score - (30.0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn penalty_decreases_as_availability_grows() {
        let mut last = f64::MAX;
        for avail in [0.0, 1024.0, 4096.0, 8192.0, 16384.0] {
            let p = availability_penalty(avail, 16384.0, 0.0);
            assert!(p < last);
            last = p;
        }
        assert_eq!(availability_penalty(16384.0, 16384.0, 0.0), 0.0);
        assert_eq!(availability_penalty(0.0, 16384.0, 0.0), 100.0);
    }

    #[test]
    fn penalty_falls_back_to_usage_without_total() {
        assert_eq!(availability_penalty(123.0, 0.0, 42.0), 42.0);
    }

    #[test]
    fn non_finite_inputs_do_not_poison_score() {
        let d = compute(&raw(f64::NAN, f64::INFINITY, 1000.0, f64::NAN, 100.0));
        assert!(d.memory_pressure_score.is_finite());
        assert!((0.0..=100.0).contains(&d.memory_pressure_score));
    }

    #[test]
    fn failure_takes_precedence_over_throttle() {
        let flags = ThrottleFlags {
            cpu: Some(true),
            gpu: None,
            query_failed: true,
        };
        assert_eq!(classify_thermal(&flags), ThermalStatus::Error);
    }

    #[test]
    fn absent_flags_are_unknown() {
        assert_eq!(
            classify_thermal(&ThrottleFlags::default()),
            ThermalStatus::Unknown
        );
    }

    #[test]
    fn any_throttled_flag_wins_over_normal() {
        let gpu_only = ThrottleFlags {
            cpu: Some(false),
            gpu: Some(true),
            query_failed: false,
        };
        assert_eq!(classify_thermal(&gpu_only), ThermalStatus::Throttled);
        let cpu_only = ThrottleFlags {
            cpu: Some(true),
            gpu: None,
            query_failed: false,
        };
        assert_eq!(classify_thermal(&cpu_only), ThermalStatus::Throttled);
    }

    #[test]
    fn partial_false_flags_are_normal() {
        let flags = ThrottleFlags {
            cpu: Some(false),
            gpu: None,
            query_failed: false,
        };
        assert_eq!(classify_thermal(&flags), ThermalStatus::Normal);
    }
}
