//! Status badges for memory pressure, swap and thermal state, plus the line
//! of explanatory text shown beneath them.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tier::TIER_THRESHOLDS;
use crate::types::{Snapshot, ThermalState};
use crate::ui::theme::{thermal_color, thermal_hint, tier_color, MUTED};

fn tier_badge<'a>(title: &'a str, value: f64) -> Paragraph<'a> {
    let t = TIER_THRESHOLDS.tier(value);
    let color = tier_color(t);
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(format!(" {value:.1}%")),
    ]))
    .block(Block::default().borders(Borders::ALL).title(title))
}

fn thermal_badge<'a>(status: ThermalState, cpu: bool, gpu: bool) -> Paragraph<'a> {
    let mut spans = vec![Span::styled(
        format!(" {status:?} "),
        Style::default()
            .fg(thermal_color(status))
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )];
    if cpu {
        spans.push(Span::raw(" cpu"));
    }
    if gpu {
        spans.push(Span::raw(" gpu"));
    }
    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("Thermal"))
}

pub fn draw_badges(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    let (pressure, swap, thermal) = match m {
        Some(s) => (
            s.memory_pressure.memory_pressure,
            s.memory_pressure.swap.percent,
            &s.thermal_status,
        ),
        None => {
            for (c, title) in cols.iter().zip(["Memory pressure", "Swap", "Thermal"]) {
                f.render_widget(Block::default().borders(Borders::ALL).title(title), *c);
            }
            return;
        }
    };
    f.render_widget(tier_badge("Memory pressure", pressure), cols[0]);
    f.render_widget(tier_badge("Swap", swap), cols[1]);
    f.render_widget(
        thermal_badge(thermal.status, thermal.cpu_throttled, thermal.gpu_throttled),
        cols[2],
    );
}

/// Text a browser would show on hover; the terminal gets it as a status line.
pub fn badge_details(m: &Snapshot) -> String {
    format!(
        "{} | {} | {}",
        TIER_THRESHOLDS.describe("Memory pressure", m.memory_pressure.memory_pressure),
        TIER_THRESHOLDS.describe("Swap", m.memory_pressure.swap.percent),
        thermal_hint(m.thermal_status.status)
    )
}

pub fn draw_details(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>) {
    let text = m.map(badge_details).unwrap_or_default();
    f.render_widget(Paragraph::new(text).style(Style::default().fg(MUTED)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemoryPressure, Swap, Thermal};

    #[test]
    fn details_mention_tier_and_thermal() {
        let s = Snapshot {
            memory_pressure: MemoryPressure {
                memory_pressure: 75.0,
                swap: Swap {
                    percent: 12.5,
                    ..Default::default()
                },
                ..Default::default()
            },
            thermal_status: Thermal {
                status: ThermalState::Error,
                ..Default::default()
            },
            ..Default::default()
        };
        let d = badge_details(&s);
        assert!(d.contains("Memory pressure 75.0% is High"), "{d}");
        assert!(d.contains("Swap 12.5% is Low"), "{d}");
        assert!(d.contains("failed to query"));
    }
}
