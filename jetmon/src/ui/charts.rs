//! Line charts over the session's rolling series.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::history::SeriesStore;
use crate::session::Metric;
use crate::tier::TIER_THRESHOLDS;
use crate::ui::theme::{tier_color, GRIDLINE, MUTED};

pub enum YScale {
    /// Fixed 0..=100 with tier gridlines.
    Percent,
    /// 0 up to the largest value currently in view.
    Auto,
}

fn x_labels(store: &SeriesStore<Metric>) -> Vec<Span<'static>> {
    let Some(labels) = store.labels() else {
        return Vec::new();
    };
    match (labels.front(), labels.back()) {
        (Some(first), Some(last)) => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        _ => Vec::new(),
    }
}

fn peak(store: &SeriesStore<Metric>, series: &[(Metric, Color)]) -> f64 {
    series
        .iter()
        .filter_map(|(m, _)| store.get(*m))
        .flat_map(|s| s.values().iter().copied())
        .fold(0.0, f64::max)
}

/// Round a peak up to a readable axis bound.
pub fn nice_ceiling(v: f64) -> f64 {
    if !v.is_finite() || v <= 1.0 {
        return 1.0;
    }
    let mag = 10f64.powi(v.log10().floor() as i32);
    let step = if v / mag <= 2.0 {
        mag / 5.0
    } else if v / mag <= 5.0 {
        mag / 2.0
    } else {
        mag
    };
    (v / step).ceil() * step
}

pub fn draw_series_chart(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    store: &SeriesStore<Metric>,
    series: &[(Metric, Color)],
    scale: YScale,
) {
    if store.is_empty() {
        let p = Paragraph::new("waiting for data...")
            .style(Style::default().fg(MUTED))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(p, area);
        return;
    }

    let x_max = (store.capacity().saturating_sub(1) as f64).max(1.0);
    let points: Vec<Vec<(f64, f64)>> = series.iter().map(|(m, _)| store.points(*m)).collect();

    let (y_max, y_labels, grid) = match scale {
        YScale::Percent => {
            let [low, high] = TIER_THRESHOLDS.gridlines();
            let labels = vec![
                Span::raw("0"),
                Span::styled(format!("{low:.0}"), Style::default().fg(tier_color(TIER_THRESHOLDS.tier(low)))),
                Span::styled(format!("{high:.0}"), Style::default().fg(tier_color(TIER_THRESHOLDS.tier(high)))),
                Span::raw("100"),
            ];
            let grid = vec![vec![(0.0, low), (x_max, low)], vec![(0.0, high), (x_max, high)]];
            (100.0, labels, grid)
        }
        YScale::Auto => {
            let top = nice_ceiling(peak(store, series));
            let labels = vec![
                Span::raw("0"),
                Span::raw(format!("{:.0}", top / 2.0)),
                Span::raw(format!("{top:.0}")),
            ];
            (top, labels, Vec::new())
        }
    };

    let mut datasets: Vec<Dataset> = grid
        .iter()
        .map(|line| {
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(GRIDLINE))
                .data(line)
        })
        .collect();
    for ((metric, color), data) in series.iter().zip(&points) {
        let now = store.latest(*metric).unwrap_or(0.0);
        datasets.push(
            Dataset::default()
                .name(format!("{} {now:.1}", metric.title()))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data),
        );
    }

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, x_max])
                .labels(x_labels(store)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_rounds_up_to_readable_steps() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(7.3), 8.0);
        assert_eq!(nice_ceiling(42.0), 45.0);
        assert_eq!(nice_ceiling(130.0), 140.0);
        assert_eq!(nice_ceiling(f64::NAN), 1.0);
    }

    #[test]
    fn peak_spans_all_requested_series() {
        let mut store = SeriesStore::new(Metric::ALL, 4);
        store.push("a", |m| if m == Metric::Upload { 12.0 } else { 3.0 });
        store.push("b", |m| if m == Metric::Download { 30.0 } else { 1.0 });
        let both = [(Metric::Upload, Color::Blue), (Metric::Download, Color::Green)];
        assert_eq!(peak(&store, &both), 30.0);
        assert_eq!(peak(&store, &both[..1]), 12.0);
    }
}
