//! Maps raw percentages onto the Low/Moderate/High tiers used by badges,
//! their hover text and the chart gridlines.

/// Inclusive upper bounds of the Low and Moderate tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub low: f64,
    pub moderate: f64,
}

pub const TIER_THRESHOLDS: TierThresholds = TierThresholds {
    low: 30.0,
    moderate: 70.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Moderate,
    High,
}

impl TierThresholds {
    pub fn tier(&self, value: f64) -> Tier {
        // NaN fails both comparisons below; keep it in the quiet tier.
        if value.is_nan() || value <= self.low {
            Tier::Low
        } else if value <= self.moderate {
            Tier::Moderate
        } else {
            Tier::High
        }
    }

    /// Y positions of the horizontal reference lines drawn on percent charts.
    pub fn gridlines(&self) -> [f64; 2] {
        [self.low, self.moderate]
    }

    /// Range text for a tier, e.g. `30-70%`.
    pub fn range(&self, tier: Tier) -> String {
        match tier {
            Tier::Low => format!("0-{:.0}%", self.low),
            Tier::Moderate => format!("{:.0}-{:.0}%", self.low, self.moderate),
            Tier::High => format!(">{:.0}%", self.moderate),
        }
    }

    /// Hover text for a badge: the current tier and where its edges sit.
    pub fn describe(&self, metric: &str, value: f64) -> String {
        let t = self.tier(value);
        format!(
            "{metric} {value:.1}% is {} ({}); Low <= {:.0}, Moderate <= {:.0}, High above",
            t.label(),
            self.range(t),
            self.low,
            self.moderate
        )
    }
}

pub fn tier(value: f64) -> Tier {
    TIER_THRESHOLDS.tier(value)
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Low => "Low",
            Tier::Moderate => "Moderate",
            Tier::High => "High",
        }
    }
}
