//! Bounded history buffers for charts.

use std::collections::VecDeque;

/// Points kept per series when nothing else is configured.
pub const DEFAULT_MAX_POINTS: usize = 60;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// One labelled series; labels and values always have equal length.
#[derive(Debug, Clone)]
pub struct RollingSeries<T> {
    labels: VecDeque<String>,
    values: VecDeque<T>,
    cap: usize,
}

impl<T> RollingSeries<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            labels: VecDeque::with_capacity(cap),
            values: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: T) {
        push_capped(&mut self.labels, label.into(), self.cap);
        push_capped(&mut self.values, value, self.cap);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn values(&self) -> &VecDeque<T> {
        &self.values
    }

    pub fn latest(&self) -> Option<(&str, &T)> {
        Some((self.labels.back()?.as_str(), self.values.back()?))
    }
}

impl<T> Default for RollingSeries<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

/// Several metrics sharing one time axis. Every push appends a value to each
/// tracked key under the same label, so all series stay index-aligned.
#[derive(Debug, Clone)]
pub struct SeriesStore<K> {
    series: Vec<(K, RollingSeries<f64>)>,
    cap: usize,
}

impl<K: Copy + PartialEq> SeriesStore<K> {
    pub fn new(keys: impl IntoIterator<Item = K>, cap: usize) -> Self {
        Self {
            series: keys.into_iter().map(|k| (k, RollingSeries::new(cap))).collect(),
            cap,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, mut value_of: impl FnMut(K) -> f64) {
        let label = label.into();
        for (key, s) in &mut self.series {
            s.push(label.clone(), value_of(*key));
        }
    }

    pub fn labels(&self) -> Option<&VecDeque<String>> {
        self.series.first().map(|(_, s)| s.labels())
    }

    pub fn get(&self, key: K) -> Option<&RollingSeries<f64>> {
        self.series.iter().find(|(k, _)| *k == key).map(|(_, s)| s)
    }

    pub fn latest(&self, key: K) -> Option<f64> {
        self.get(key).and_then(|s| s.latest()).map(|(_, v)| *v)
    }

    /// (index, value) pairs ready for a line chart.
    pub fn points(&self, key: K) -> Vec<(f64, f64)> {
        self.get(key)
            .map(|s| {
                s.values()
                    .iter()
                    .enumerate()
                    .map(|(i, y)| (i as f64, *y))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |(_, s)| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}
