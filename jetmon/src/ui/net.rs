//! Throughput sparklines fed from the KB/s series.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};
use std::collections::VecDeque;

// Sparkline bars are integers; keep only what fits inside the borders.
fn visible_bars(hist: &VecDeque<f64>, width: usize) -> Vec<u64> {
    let skip = hist.len().saturating_sub(width);
    hist.iter()
        .skip(skip)
        .map(|kb| if kb.is_finite() { kb.max(0.0).round() as u64 } else { 0 })
        .collect()
}

pub fn draw_net_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &VecDeque<f64>,
    color: Color,
) {
    let bars = visible_bars(hist, area.width.saturating_sub(2) as usize);
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    f.render_widget(
        Sparkline::default()
            .block(block)
            .data(&bars)
            .style(Style::default().fg(color)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_bars_that_fit() {
        let hist: VecDeque<f64> = [1.4, 2.6, f64::NAN, -3.0, 10.0].into_iter().collect();
        assert_eq!(visible_bars(&hist, 3), vec![0, 0, 10]);
        assert_eq!(visible_bars(&hist, 10), vec![1, 3, 0, 0, 10]);
    }
}
