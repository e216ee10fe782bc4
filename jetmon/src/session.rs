//! Dashboard session: the rolling series, the active poll interval and the
//! most recent snapshot. The UI loop is its only writer.

use crate::history::{SeriesStore, DEFAULT_MAX_POINTS};
use crate::poller::{PollEvent, PollInterval};
use crate::types::Snapshot;

const BYTES_PER_KB: f64 = 1024.0;
const MW_PER_W: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
    MemoryPressure,
    Swap,
    GpuUtil,
    GpuTemp,
    CpuTemp,
    Upload,
    Download,
    TotalPower,
    GpuPower,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::Disk,
        Metric::MemoryPressure,
        Metric::Swap,
        Metric::GpuUtil,
        Metric::GpuTemp,
        Metric::CpuTemp,
        Metric::Upload,
        Metric::Download,
        Metric::TotalPower,
        Metric::GpuPower,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Memory => "Memory",
            Metric::Disk => "Disk",
            Metric::MemoryPressure => "Pressure",
            Metric::Swap => "Swap",
            Metric::GpuUtil => "GPU",
            Metric::GpuTemp => "GPU temp",
            Metric::CpuTemp => "CPU temp",
            Metric::Upload => "Upload",
            Metric::Download => "Download",
            Metric::TotalPower => "Total",
            Metric::GpuPower => "GPU",
        }
    }

    /// Value charted for this metric; sensors the agent did not report read 0.
    pub fn value(self, s: &Snapshot) -> f64 {
        let g = &s.gpu_metrics;
        let v = match self {
            Metric::Cpu => s.cpu_percent,
            Metric::Memory => s.memory_percent,
            Metric::Disk => s.disk_percent,
            Metric::MemoryPressure => s.memory_pressure.memory_pressure,
            Metric::Swap => s.memory_pressure.swap.percent,
            Metric::GpuUtil => g.gpu_utilization.unwrap_or(0.0),
            Metric::GpuTemp => g.gpu_temperature.unwrap_or(0.0),
            Metric::CpuTemp => g.cpu_temperature.unwrap_or(0.0),
            Metric::Upload => s.network.sent_speed / BYTES_PER_KB,
            Metric::Download => s.network.recv_speed / BYTES_PER_KB,
            Metric::TotalPower => g.total_power.unwrap_or(0.0) / MW_PER_W,
            Metric::GpuPower => g.gpu_power.unwrap_or(0.0) / MW_PER_W,
        };
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }
}

/// `HH:MM:SS` for the chart axis, from the agent's `YYYY-MM-DD HH:MM:SS`
/// timestamp, or local time when the agent sent something else.
pub fn time_label(timestamp: &str) -> String {
    match chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S") {
        Ok(t) => t.format("%H:%M:%S").to_string(),
        Err(_) => chrono::Local::now().format("%H:%M:%S").to_string(),
    }
}

pub struct Session {
    store: SeriesStore<Metric>,
    interval: PollInterval,
    latest: Option<Snapshot>,
    last_error: Option<String>,
    samples: u64,
    failures: u64,
}

impl Session {
    pub fn new(interval: PollInterval) -> Self {
        Self::with_capacity(interval, DEFAULT_MAX_POINTS)
    }

    pub fn with_capacity(interval: PollInterval, max_points: usize) -> Self {
        Self {
            store: SeriesStore::new(Metric::ALL, max_points),
            interval,
            latest: None,
            last_error: None,
            samples: 0,
            failures: 0,
        }
    }

    pub fn apply(&mut self, ev: PollEvent) {
        match ev {
            PollEvent::Snapshot(s) => self.record(*s),
            PollEvent::Failed(reason) => self.record_failure(reason),
        }
    }

    pub fn record(&mut self, snap: Snapshot) {
        let label = time_label(&snap.timestamp);
        self.store.push(label, |m| m.value(&snap));
        self.latest = Some(snap);
        self.last_error = None;
        self.samples += 1;
    }

    // Series and the last good snapshot are left untouched.
    pub fn record_failure(&mut self, reason: String) {
        self.last_error = Some(reason);
        self.failures += 1;
    }

    pub fn store(&self) -> &SeriesStore<Metric> {
        &self.store
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn interval(&self) -> PollInterval {
        self.interval
    }

    pub fn set_interval(&mut self, interval: PollInterval) {
        self.interval = interval;
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::{tier, Tier};
    use crate::types::{GpuMetrics, MemoryPressure, Network, Swap};

    fn snapshot(ts: &str, cpu: f64) -> Snapshot {
        Snapshot {
            timestamp: ts.into(),
            cpu_percent: cpu,
            ..Default::default()
        }
    }

    #[test]
    fn label_is_time_of_day() {
        assert_eq!(time_label("2024-05-06 13:14:15"), "13:14:15");
        assert_eq!(time_label("garbage").len(), 8);
    }

    #[test]
    fn success_pushes_every_metric() {
        let mut s = Session::new(PollInterval::default());
        let snap = Snapshot {
            timestamp: "2024-05-06 13:14:15".into(),
            memory_pressure: MemoryPressure {
                memory_pressure: 65.0,
                swap: Swap {
                    percent: 50.0,
                    ..Default::default()
                },
                ..Default::default()
            },
            network: Network {
                recv_speed: 2048.0,
                ..Default::default()
            },
            gpu_metrics: GpuMetrics {
                total_power: Some(7500.0),
                ..Default::default()
            },
            ..Default::default()
        };
        s.apply(PollEvent::Snapshot(Box::new(snap)));

        let store = s.store();
        assert_eq!(store.len(), 1);
        for m in Metric::ALL {
            assert_eq!(store.get(m).map(|v| v.len()), Some(1), "{m:?}");
        }
        assert_eq!(store.latest(Metric::MemoryPressure), Some(65.0));
        assert_eq!(tier(store.latest(Metric::MemoryPressure).unwrap()), Tier::Moderate);
        assert_eq!(store.latest(Metric::Swap), Some(50.0));
        assert_eq!(store.latest(Metric::Download), Some(2.0));
        assert_eq!(store.latest(Metric::TotalPower), Some(7.5));
        // sensors the agent omitted chart as zero
        assert_eq!(store.latest(Metric::GpuTemp), Some(0.0));
        assert_eq!(
            store.labels().and_then(|l| l.back()).map(String::as_str),
            Some("13:14:15")
        );
    }

    #[test]
    fn failure_leaves_series_untouched() {
        let mut s = Session::new(PollInterval::default());
        s.apply(PollEvent::Snapshot(Box::new(snapshot("2024-05-06 10:00:00", 10.0))));
        s.apply(PollEvent::Failed("connection refused".into()));

        assert_eq!(s.store().len(), 1);
        assert_eq!(s.last_error(), Some("connection refused"));
        assert_eq!(s.latest().map(|l| l.cpu_percent), Some(10.0));
        assert_eq!(s.failures(), 1);

        s.apply(PollEvent::Snapshot(Box::new(snapshot("2024-05-06 10:00:02", 20.0))));
        assert_eq!(s.last_error(), None);
        assert_eq!(s.store().len(), 2);
        assert_eq!(s.samples(), 2);
    }

    #[test]
    fn window_is_bounded() {
        let mut s = Session::with_capacity(PollInterval::default(), 60);
        for i in 1..=61 {
            s.record(snapshot("2024-05-06 10:00:00", i as f64));
        }
        let cpu: Vec<f64> = s
            .store()
            .get(Metric::Cpu)
            .unwrap()
            .values()
            .iter()
            .copied()
            .collect();
        assert_eq!(cpu, (2..=61).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn non_finite_values_chart_as_zero() {
        let snap = snapshot("", f64::NAN);
        assert_eq!(Metric::Cpu.value(&snap), 0.0);
    }
}
