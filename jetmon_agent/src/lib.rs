//! jetmon_agent: samples host telemetry and serves the latest snapshot as JSON.

pub mod config;
pub mod derive;
pub mod format;
pub mod gpu;
pub mod http;
pub mod metrics;
pub mod sample;
pub mod sampler;
pub mod state;
pub mod tegrastats;
pub mod thermal;
pub mod tls;
pub mod types;
