//! Shared UI theme constants.

use ratatui::style::Color;

use crate::tier::Tier;
use crate::types::ThermalState;

// Tier colours (badges, gauges, gridlines)
pub const TIER_LOW: Color = Color::Green;
pub const TIER_MODERATE: Color = Color::Yellow;
pub const TIER_HIGH: Color = Color::Red;

pub const GRIDLINE: Color = Color::Rgb(90, 90, 100);
pub const MUTED: Color = Color::Gray;

// Series colours
pub const CPU: Color = Color::Cyan;
pub const MEMORY: Color = Color::Magenta;
pub const DISK: Color = Color::LightBlue;
pub const GPU: Color = Color::LightGreen;
pub const PRESSURE: Color = Color::LightRed;
pub const SWAP: Color = Color::Yellow;
pub const DOWNLOAD: Color = Color::Green;
pub const UPLOAD: Color = Color::Blue;

pub fn tier_color(t: Tier) -> Color {
    match t {
        Tier::Low => TIER_LOW,
        Tier::Moderate => TIER_MODERATE,
        Tier::High => TIER_HIGH,
    }
}

pub fn thermal_color(s: ThermalState) -> Color {
    match s {
        ThermalState::Normal => Color::Green,
        ThermalState::Throttled => Color::Red,
        ThermalState::Unknown => Color::Gray,
        ThermalState::Error => Color::Magenta,
    }
}

pub fn thermal_hint(s: ThermalState) -> &'static str {
    match s {
        ThermalState::Normal => "Thermal: no throttling reported",
        ThermalState::Throttled => "Thermal: CPU or GPU is being throttled",
        ThermalState::Unknown => "Thermal: throttle state not available on this host",
        ThermalState::Error => "Thermal: failed to query throttle state",
    }
}
