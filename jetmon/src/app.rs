//! App state and main loop: input handling, poll events, and drawing.

use std::{io, sync::Arc, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::{sync::mpsc, time::sleep};
use tracing::info;

use crate::poller::{PollEvent, PollInterval, PollState, Poller, SnapshotSource};
use crate::session::{Metric, Session};
use crate::ui::{
    badges::{draw_badges, draw_details},
    charts::{draw_series_chart, YScale},
    gpu::draw_gpu,
    header::draw_header,
    mem::{draw_mem, draw_swap},
    net::draw_net_spark,
    theme,
};

const FRAME: Duration = Duration::from_millis(100);
const EVENT_BUFFER: usize = 32;

pub struct App {
    session: Session,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run<S: SnapshotSource>(
        &mut self,
        source: Arc<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let poller = Poller::new(source, tx);
        poller.start(self.session.interval());
        info!(secs = self.session.interval().secs(), "polling started");

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, &poller, &mut rx).await;

        // Teardown
        poller.stop();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend, S: SnapshotSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        poller: &Poller<S>,
        rx: &mut mpsc::Receiver<PollEvent>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Release {
                        continue;
                    }
                    if let Some(interval) = self.handle_key(k.code) {
                        poller.reconfigure(interval);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(ev) = rx.try_recv() {
                self.session.apply(ev);
            }

            let state = poller.state();
            terminal.draw(|f| self.draw(f, state))?;

            sleep(FRAME).await;
        }

        Ok(())
    }

    /// Applies a key press. Returns the new interval when it changed.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<PollInterval> {
        let delta = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => 1,
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => -1,
            _ => return None,
        };
        let current = self.session.interval();
        let next = current.step(delta);
        if next == current {
            return None;
        }
        self.session.set_interval(next);
        info!(secs = next.secs(), "poll interval changed");
        Some(next)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>, state: PollState) {
        let area = f.area();
        let latest = self.session.latest();
        let store = self.session.store();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Length(3),   // badges
                Constraint::Ratio(1, 3), // utilisation + pressure charts
                Constraint::Length(3),   // memory + swap gauges
                Constraint::Min(10),     // network, sensors, GPU
                Constraint::Length(1),   // badge details
            ])
            .split(area);

        draw_header(f, rows[0], &self.session, state);
        draw_badges(f, rows[1], latest);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);
        draw_series_chart(
            f,
            top[0],
            "Utilization (%)",
            store,
            &[
                (Metric::Cpu, theme::CPU),
                (Metric::Memory, theme::MEMORY),
                (Metric::Disk, theme::DISK),
                (Metric::GpuUtil, theme::GPU),
            ],
            YScale::Percent,
        );
        draw_series_chart(
            f,
            top[1],
            "Memory pressure (%)",
            store,
            &[
                (Metric::MemoryPressure, theme::PRESSURE),
                (Metric::Swap, theme::SWAP),
            ],
            YScale::Percent,
        );

        let gauges = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        draw_mem(f, gauges[0], latest);
        draw_swap(f, gauges[1], latest);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(rows[4]);

        let net = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(bottom[0]);
        for (slot, metric, color) in [
            (net[0], Metric::Download, theme::DOWNLOAD),
            (net[1], Metric::Upload, theme::UPLOAD),
        ] {
            let Some(series) = store.get(metric) else {
                continue;
            };
            let peak = series.values().iter().copied().fold(0.0, f64::max);
            let now = series.latest().map(|(_, v)| *v).unwrap_or(0.0);
            draw_net_spark(
                f,
                slot,
                &format!("{} (KB/s) now: {now:.1} | peak: {peak:.1}", metric.title()),
                series.values(),
                color,
            );
        }

        let sensors = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(bottom[1]);
        draw_series_chart(
            f,
            sensors[0],
            "Temperature (°C)",
            store,
            &[
                (Metric::CpuTemp, theme::CPU),
                (Metric::GpuTemp, theme::GPU),
            ],
            YScale::Auto,
        );
        draw_series_chart(
            f,
            sensors[1],
            "Power (W)",
            store,
            &[
                (Metric::TotalPower, theme::PRESSURE),
                (Metric::GpuPower, theme::GPU),
            ],
            YScale::Auto,
        );

        draw_gpu(f, bottom[2], latest.map(|s| &s.gpu_metrics));
        draw_details(f, rows[5], latest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app(secs: u64) -> App {
        App::new(Session::new(PollInterval::from_secs(secs).unwrap()))
    }

    #[test]
    fn plus_and_minus_step_interval() {
        let mut a = app(5);
        assert_eq!(a.handle_key(KeyCode::Char('+')).map(|i| i.secs()), Some(6));
        assert_eq!(a.handle_key(KeyCode::Down).map(|i| i.secs()), Some(5));
        assert_eq!(a.session().interval().secs(), 5);
    }

    #[test]
    fn interval_saturates_without_reconfigure() {
        let mut a = app(60);
        assert_eq!(a.handle_key(KeyCode::Up), None);
        let mut a = app(1);
        assert_eq!(a.handle_key(KeyCode::Char('-')), None);
        assert_eq!(a.session().interval().secs(), 1);
    }

    #[test]
    fn q_quits() {
        let mut a = app(2);
        assert_eq!(a.handle_key(KeyCode::Char('x')), None);
        assert!(!a.should_quit());
        a.handle_key(KeyCode::Char('q'));
        assert!(a.should_quit());
    }

    #[test]
    fn draws_before_and_after_first_snapshot() {
        let mut a = app(2);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| a.draw(f, PollState::Scheduled)).unwrap();

        a.session.apply(PollEvent::Snapshot(Box::default()));
        a.session.apply(PollEvent::Failed("timed out".into()));
        terminal.draw(|f| a.draw(f, PollState::Fetching)).unwrap();
    }
}
