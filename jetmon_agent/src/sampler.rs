//! Background sampler: periodically collects metrics and refreshes the JSON
//! cache, so HTTP replies just read and send the cached body.

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::metrics::collect_snapshot;
use crate::state::AppState;

pub fn spawn_sampler(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        // A slow probe (tegrastats blocks ~1s) must not cause a burst of catch-up samples.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            refresh_cache(&state).await;
        }
    })
}

/// Collect one snapshot and store its JSON. Returns the new body.
pub async fn refresh_cache(state: &AppState) -> Option<String> {
    let snapshot = collect_snapshot(state).await;
    match serde_json::to_string(&snapshot) {
        Ok(js) => {
            debug!(
                cpu = snapshot.cpu_percent,
                pressure = snapshot.memory_pressure.memory_pressure,
                "sampled"
            );
            *state.last_json.write().await = js.clone();
            Some(js)
        }
        Err(e) => {
            warn!("snapshot serialization failed: {e}");
            None
        }
    }
}
