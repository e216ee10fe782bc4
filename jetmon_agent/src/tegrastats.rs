//! NVIDIA Jetson support: board detection and `tegrastats` line parsing.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Context};
use once_cell::sync::OnceCell;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::sample::{CpuCore, GpuReading};

pub const TEGRASTATS_INTERVAL_MS: u64 = 1000;
const MODEL_PATH: &str = "/proc/device-tree/model";

// Rail names differ between Nano/TX2/Xavier/Orin boards; first hit wins.
const TOTAL_RAILS: &[&str] = &["VDD_IN", "POM_5V_IN"];
const GPU_RAILS: &[&str] = &["VDD_CPU_GPU_CV", "VDD_GPU_SOC", "POM_5V_GPU", "VDD_GPU"];

pub fn is_jetson_model(model: &str) -> bool {
    model.to_ascii_lowercase().contains("jetson")
}

/// Reads the device-tree model once; any read error means "not a Jetson".
pub fn is_jetson() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::fs::read_to_string(MODEL_PATH)
            .map(|m| is_jetson_model(&m))
            .unwrap_or(false)
    })
}

/// Value of the token following `key`, cut at the first `suffix`.
/// `"GR3D_FREQ 50%"` with key `GR3D_FREQ` and suffix `%` gives 50.
pub fn parse_value(stats: &str, key: &str, suffix: &str) -> Option<f64> {
    let mut it = stats.split_whitespace();
    while let Some(tok) = it.next() {
        if tok == key {
            let next = it.next()?;
            let (num, _) = next.split_once(suffix)?;
            return num.parse().ok();
        }
    }
    None
}

/// Value of a `name@VALUE<suffix>` token such as `gpu@45C` or `GPU@45.5C`.
pub fn parse_at_value(stats: &str, name: &str, suffix: &str) -> Option<f64> {
    stats.split_whitespace().find_map(|tok| {
        let (n, rest) = tok.split_once('@')?;
        if !n.eq_ignore_ascii_case(name) {
            return None;
        }
        let (num, _) = rest.split_once(suffix)?;
        num.parse().ok()
    })
}

/// `RAM 2048/8192MB` -> (used, total) in MB.
pub fn parse_ram(stats: &str) -> Option<(f64, f64)> {
    let mut it = stats.split_whitespace();
    while let Some(tok) = it.next() {
        if tok == "RAM" {
            let (used, rest) = it.next()?.split_once('/')?;
            let (total, _) = rest.split_once("MB")?;
            return Some((used.parse().ok()?, total.parse().ok()?));
        }
    }
    None
}

/// `CPU [25%@1479,off,50%@1479]` -> one entry per online core, in order.
/// Offline cores and malformed entries are skipped.
pub fn parse_cpu_cores(stats: &str) -> Vec<CpuCore> {
    let Some((_, rest)) = stats.split_once("CPU [") else {
        return Vec::new();
    };
    let Some((list, _)) = rest.split_once(']') else {
        return Vec::new();
    };
    list.split(',')
        .filter_map(|entry| {
            let (usage, freq) = entry.trim().split_once("%@")?;
            Some(CpuCore {
                usage: usage.parse().ok()?,
                frequency: freq.parse().ok()?,
            })
        })
        .collect()
}

fn first_rail(stats: &str, rails: &[&str]) -> Option<f64> {
    rails.iter().find_map(|r| parse_value(stats, r, "mW"))
}

pub fn gpu_reading_from_line(line: &str) -> GpuReading {
    let ram = parse_ram(line);
    GpuReading {
        utilization: parse_value(line, "GR3D_FREQ", "%"),
        temp_c: parse_at_value(line, "gpu", "C"),
        power_mw: first_rail(line, GPU_RAILS),
        total_power_mw: first_rail(line, TOTAL_RAILS),
        mem_used_mb: None,
        mem_total_mb: None,
        ram_used_mb: ram.map(|r| r.0),
        ram_total_mb: ram.map(|r| r.1),
        cpu_cores: parse_cpu_cores(line),
        error: None,
    }
}

pub fn cpu_temp_from_line(line: &str) -> Option<f64> {
    parse_at_value(line, "cpu", "C")
}

/// Run `tegrastats` just long enough to read one line.
pub async fn read_line() -> anyhow::Result<String> {
    let mut child = Command::new("tegrastats")
        .arg("--interval")
        .arg(TEGRASTATS_INTERVAL_MS.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context("spawn tegrastats")?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("tegrastats has no stdout"))?;
    let mut lines = BufReader::new(stdout).lines();
    let line = tokio::time::timeout(
        Duration::from_millis(TEGRASTATS_INTERVAL_MS * 3),
        lines.next_line(),
    )
    .await
    .context("tegrastats timed out")??;
    let _ = child.kill().await;
    line.ok_or_else(|| anyhow!("tegrastats produced no output"))
}
