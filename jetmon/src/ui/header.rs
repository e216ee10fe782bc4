//! Top header: host, platform, uptime, poll interval and connection state.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::poller::PollState;
use crate::session::Session;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, session: &Session, state: PollState) {
    let every = format!("every {}s", session.interval().secs());
    let mut spans = match session.latest() {
        Some(s) => {
            let kind = if s.platform.is_jetson { "Jetson" } else { s.platform.machine.as_str() };
            vec![Span::raw(format!(
                "jetmon | host: {} ({} {}) | up {} | {} | {}",
                s.platform.hostname, s.platform.system, kind, s.uptime, s.timestamp, every
            ))]
        }
        None => vec![Span::raw(format!("jetmon | connecting... | {every}"))],
    };
    if state == PollState::Fetching {
        spans.push(Span::styled(" *", Style::default().fg(Color::Cyan)));
    }
    if let Some(err) = session.last_error() {
        spans.push(Span::styled(
            format!(" | error: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::raw("  (+/- interval, 'q' quit)"));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
