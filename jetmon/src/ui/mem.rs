//! Memory and swap gauges, coloured by usage tier.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::tier::tier;
use crate::types::Snapshot;
use crate::ui::theme::tier_color;
use crate::ui::util::{gauge_percent, human_mb};

fn tier_gauge<'a>(title: &'a str, pct: f64, label: String) -> Gauge<'a> {
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(tier_color(tier(pct))))
        .percent(gauge_percent(pct))
        .label(label)
}

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>) {
    let (pct, label) = match m {
        Some(s) => {
            let mem = &s.memory_pressure.memory;
            let used = (mem.total - mem.available).max(0.0);
            (
                s.memory_percent,
                format!("{} / {} ({:.1}%)", human_mb(used), human_mb(mem.total), s.memory_percent),
            )
        }
        None => (0.0, String::new()),
    };
    f.render_widget(tier_gauge("Memory", pct, label), area);
}

pub fn draw_swap(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>) {
    let (pct, label) = match m {
        Some(s) => {
            let swap = &s.memory_pressure.swap;
            let label = if swap.total > 0.0 {
                format!("{} / {} ({:.1}%)", human_mb(swap.used), human_mb(swap.total), swap.percent)
            } else {
                "no swap".to_string()
            };
            (swap.percent, label)
        }
        None => (0.0, String::new()),
    };
    f.render_widget(tier_gauge("Swap", pct, label), area);
}
