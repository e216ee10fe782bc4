use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::types::GpuMetrics;
use crate::ui::util::{gauge_percent, human_mb, opt_reading};

const MW_PER_W: f64 = 1000.0;

fn watts(mw: Option<f64>) -> Option<f64> {
    mw.map(|v| v / MW_PER_W)
}

/// Gauge percent and label for the memory row. Jetson boards report
/// unified RAM instead of VRAM.
fn memory_row(g: &GpuMetrics) -> (f64, String) {
    if let (Some(used), Some(total)) = (g.gpu_memory_used, g.gpu_memory_total) {
        let pct = g.gpu_memory_percent.unwrap_or(0.0);
        return (pct, format!("vram: {}/{} ({pct:.0}%)", human_mb(used), human_mb(total)));
    }
    if let (Some(used), Some(total)) = (g.ram_used, g.ram_total) {
        let pct = g.ram_percent.unwrap_or(0.0);
        return (pct, format!("ram (shared): {}/{} ({pct:.0}%)", human_mb(used), human_mb(total)));
    }
    (0.0, "vram: N/A".to_string())
}

pub fn draw_gpu(f: &mut ratatui::Frame<'_>, area: Rect, g: Option<&GpuMetrics>) {
    let mut area = area;
    let block = Block::default().borders(Borders::ALL).title("GPU");
    f.render_widget(block, area);

    // Guard: need some space inside the block
    if area.height <= 2 || area.width <= 2 {
        return;
    }

    area.y += 1;
    area.height = area.height.saturating_sub(2);
    area.x += 1;
    area.width = area.width.saturating_sub(2);

    let Some(g) = g else {
        return;
    };

    if let Some(err) = g.error.as_deref() {
        f.render_widget(
            Paragraph::new(err.to_string()).style(Style::default().fg(Color::Gray)),
            area,
        );
        return;
    }

    // util bar, vram bar, sensor line
    if area.height < 3 {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 3])
        .split(area);

    // Per bar horizontal layout: [gauge] [value]
    let split_bar = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(8), Constraint::Length(24)])
            .split(r)
    };

    let util_cols = split_bar(rows[0]);
    let util = g.gpu_utilization.unwrap_or(0.0);
    let util_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .label(Span::raw(""))
        .percent(gauge_percent(util));
    f.render_widget(util_gauge, util_cols[0]);
    f.render_widget(
        Paragraph::new(Span::raw(format!("util: {}", opt_reading(g.gpu_utilization, "%"))))
            .style(Style::default().fg(Color::Gray)),
        util_cols[1],
    );

    let mem_cols = split_bar(rows[1]);
    let (mem_pct, mem_label) = memory_row(g);
    let mem_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightMagenta))
        .label(Span::raw(""))
        .percent(gauge_percent(mem_pct));
    f.render_widget(mem_gauge, mem_cols[0]);
    f.render_widget(
        Paragraph::new(Span::raw(mem_label)).style(Style::default().fg(Color::Gray)),
        mem_cols[1],
    );

    let sensors = format!(
        "temp: {}  power: {} (total {})",
        opt_reading(g.gpu_temperature, "°C"),
        opt_reading(watts(g.gpu_power), "W"),
        opt_reading(watts(g.total_power), "W"),
    );
    f.render_widget(
        Paragraph::new(Span::raw(sensors)).style(Style::default().fg(Color::Gray)),
        rows[2],
    );
}
