//! Shared agent state: sysinfo handles and hot JSON cache.

use std::sync::Arc;
use sysinfo::{Components, Disks, Networks, System};
use tokio::sync::{Mutex, RwLock};

use crate::metrics::NetRate;
use crate::types::PlatformInfo;

pub type SharedSystem = Arc<Mutex<System>>;
pub type SharedNetworks = Arc<Mutex<Networks>>;
pub type SharedComponents = Arc<Mutex<Components>>;
pub type SharedDisks = Arc<Mutex<Disks>>;

#[derive(Clone)]
pub struct AppState {
    // Persistent sysinfo handles
    pub sys: SharedSystem,
    pub networks: SharedNetworks,
    pub components: SharedComponents,
    pub disks: SharedDisks,

    // Previous network counters for bytes/sec
    pub net_rate: Arc<Mutex<NetRate>>,

    // Last serialized JSON snapshot for fast HTTP responses
    pub last_json: Arc<RwLock<String>>,

    pub platform: Arc<PlatformInfo>,
}

impl AppState {
    pub fn new(platform: PlatformInfo) -> Self {
        let mut sys = System::new();
        // Prime CPU counters so the first sample has a delta to work with.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            components: Arc::new(Mutex::new(Components::new_with_refreshed_list())),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
            net_rate: Arc::new(Mutex::new(NetRate::default())),
            last_json: Arc::new(RwLock::new(String::new())),
            platform: Arc::new(platform),
        }
    }
}
