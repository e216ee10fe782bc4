//! Human-readable strings carried next to the numeric fields of a snapshot.

use time::{macros::format_description, OffsetDateTime};

pub const BYTES_PER_KB: f64 = 1024.0;
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn format_bytes(b: u64) -> String {
    let fb = b as f64;
    if fb < BYTES_PER_KB {
        format!("{b} B")
    } else if fb < BYTES_PER_MB {
        format!("{:.1} KB", fb / BYTES_PER_KB)
    } else if fb < BYTES_PER_GB {
        format!("{:.1} MB", fb / BYTES_PER_MB)
    } else {
        format!("{:.2} GB", fb / BYTES_PER_GB)
    }
}

pub fn format_speed(bytes_per_sec: f64) -> String {
    let kb = if bytes_per_sec.is_finite() {
        bytes_per_sec.max(0.0) / BYTES_PER_KB
    } else {
        0.0
    };
    format!("{kb:.1} KB/s")
}

pub fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h}h {m}m {s}s")
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    ts.format(&fmt).unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

/// Local wall-clock time, or UTC when the local offset cannot be determined
/// (the `time` crate refuses to read it from a multi-threaded process on some
/// platforms).
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
