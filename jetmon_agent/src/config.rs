//! Startup configuration: command line first, then environment, then defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use once_cell::sync::OnceCell;

pub const DEFAULT_PORT: u16 = 5005;
pub const DEFAULT_SAMPLE_MS: u64 = 1000;
// cpu% needs two refreshes at least this far apart to be meaningful
pub const MIN_SAMPLE_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub sample_period: Duration,
    pub enable_ssl: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            sample_period: Duration::from_millis(DEFAULT_SAMPLE_MS),
            enable_ssl: false,
        }
    }
}

impl AgentConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

pub fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--port PORT|-p PORT] [--bind ADDR] [--interval-ms MS] [--enableSSL]")
}

/// Parse argv (program name first). Errors carry the text to print.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<AgentConfig, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "jetmon_agent".into());
    let mut cfg = AgentConfig::default();

    let mut port: Option<String> = env_nonempty("JETMON_AGENT_PORT");
    let mut sample: Option<String> = env_nonempty("JETMON_AGENT_SAMPLE_MS");
    let mut bind: Option<String> = None;
    cfg.enable_ssl = env_flag("JETMON_ENABLE_SSL", false);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--port" | "-p" => port = Some(flag_value(&mut it, &arg, &prog)?),
            "--bind" => bind = Some(flag_value(&mut it, &arg, &prog)?),
            "--interval-ms" => sample = Some(flag_value(&mut it, &arg, &prog)?),
            "--enableSSL" | "--enable-ssl" => cfg.enable_ssl = true,
            _ if arg.starts_with("--port=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ if arg.starts_with("--bind=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    bind = Some(v.to_string());
                }
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {}", usage(&prog))),
        }
    }

    if let Some(p) = port {
        cfg.port = p
            .parse()
            .map_err(|_| format!("invalid port '{p}'. {}", usage(&prog)))?;
    }
    if let Some(b) = bind {
        cfg.bind = b
            .parse()
            .map_err(|_| format!("invalid bind address '{b}'. {}", usage(&prog)))?;
    }
    if let Some(s) = sample {
        let ms: u64 = s
            .parse()
            .map_err(|_| format!("invalid sampling interval '{s}'. {}", usage(&prog)))?;
        cfg.sample_period = Duration::from_millis(ms.max(MIN_SAMPLE_MS));
    }
    Ok(cfg)
}

fn flag_value(
    it: &mut impl Iterator<Item = String>,
    flag: &str,
    prog: &str,
) -> Result<String, String> {
    it.next()
        .ok_or_else(|| format!("missing value for {flag}. {}", usage(prog)))
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key).map(|v| v != "0").unwrap_or(default)
}

// Runtime toggles (read once)
pub fn gpu_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| env_flag("JETMON_AGENT_GPU", true))
}

pub fn temp_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| env_flag("JETMON_AGENT_TEMP", true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("jetmon_agent")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults() {
        let cfg = parse_args(args(&[])).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.sample_period, Duration::from_millis(DEFAULT_SAMPLE_MS));
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:5005");
    }

    #[test]
    fn bind_and_interval() {
        let cfg = parse_args(args(&["--bind", "127.0.0.1", "--interval-ms", "2000"])).unwrap();
        assert_eq!(cfg.addr().to_string(), "127.0.0.1:5005");
        assert_eq!(cfg.sample_period, Duration::from_secs(2));
    }

    #[test]
    fn interval_has_a_floor() {
        let cfg = parse_args(args(&["--interval-ms", "10"])).unwrap();
        assert_eq!(cfg.sample_period, Duration::from_millis(MIN_SAMPLE_MS));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_args(args(&["--port", "http"])).is_err());
        assert!(parse_args(args(&["--bind", "nowhere"])).is_err());
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        let help = parse_args(args(&["--help"])).unwrap_err();
        assert!(help.starts_with("Usage:"));
    }

    #[test]
    fn trailing_flag_without_value_is_an_error() {
        for flag in ["--port", "-p", "--bind", "--interval-ms"] {
            let err = parse_args(args(&[flag])).unwrap_err();
            assert!(err.starts_with(&format!("missing value for {flag}")), "{err}");
        }
        let err = parse_args(args(&["--bind", "127.0.0.1", "--port"])).unwrap_err();
        assert!(err.contains("missing value for --port"), "{err}");
    }
}
