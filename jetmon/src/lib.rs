//! jetmon library: snapshot types, tier classification, rolling series,
//! polling and the terminal dashboard.

pub mod app;
pub mod error;
pub mod history;
pub mod http;
pub mod logging;
pub mod poller;
pub mod profiles;
pub mod session;
pub mod tier;
pub mod types;
pub mod ui;
