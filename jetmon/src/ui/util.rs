//! Small UI helpers: human-readable sizes and optional readings.

pub fn human_mb(mb: f64) -> String {
    if !mb.is_finite() || mb <= 0.0 {
        return "0MB".into();
    }
    if mb < 1024.0 {
        format!("{mb:.0}MB")
    } else {
        format!("{:.1}GB", mb / 1024.0)
    }
}

pub fn opt_reading(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.1}{unit}"),
        _ => "N/A".into(),
    }
}

/// Clamps a percentage into what `Gauge::percent` accepts.
pub fn gauge_percent(v: f64) -> u16 {
    if v.is_finite() {
        v.clamp(0.0, 100.0).round() as u16
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_mb_switches_to_gb() {
        assert_eq!(human_mb(512.0), "512MB");
        assert_eq!(human_mb(1536.0), "1.5GB");
        assert_eq!(human_mb(-1.0), "0MB");
    }

    #[test]
    fn readings_and_percent() {
        assert_eq!(opt_reading(Some(45.25), "°C"), "45.2°C");
        assert_eq!(opt_reading(None, "W"), "N/A");
        assert_eq!(gauge_percent(123.0), 100);
        assert_eq!(gauge_percent(f64::NAN), 0);
        assert_eq!(gauge_percent(64.6), 65);
    }
}
