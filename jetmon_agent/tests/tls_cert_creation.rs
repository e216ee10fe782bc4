//! Self-signed certificate handling for `--enableSSL`.

use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use jetmon_agent::tls::{cert_paths, ensure_self_signed_cert};

// XDG_CONFIG_HOME is process-wide.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn wait_until(deadline: Duration, mut ready: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if ready() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    ready()
}

fn non_empty(p: &Path) -> bool {
    fs::metadata(p).map(|m| m.len() > 0).unwrap_or(false)
}

#[test]
fn agent_with_ssl_writes_cert_under_xdg_config() {
    let xdg = tempfile::tempdir().expect("tempdir");
    let tls_dir = xdg.path().join("jetmon_agent").join("tls");
    let (cert, key) = (tls_dir.join("cert.pem"), tls_dir.join("key.pem"));

    let mut child = Command::cargo_bin("jetmon_agent")
        .expect("binary exists")
        .env("XDG_CONFIG_HOME", xdg.path())
        .env("JETMON_AGENT_GPU", "0")
        .args(["--enableSSL", "--bind", "127.0.0.1", "-p", "0"])
        .spawn()
        .expect("spawn agent");

    let appeared = wait_until(Duration::from_secs(3), || non_empty(&cert) && non_empty(&key));
    let _ = child.kill();
    let _ = child.wait();

    assert!(appeared, "cert/key not written under {}", tls_dir.display());
    let pem = fs::read_to_string(&cert).unwrap();
    assert!(pem.contains("BEGIN CERTIFICATE"), "{pem}");
}

#[test]
fn existing_cert_is_reused() {
    let _guard = ENV_LOCK.lock().unwrap();
    let xdg = tempfile::tempdir().expect("tempdir");
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());

    let (cert, key) = ensure_self_signed_cert().expect("generate");
    assert_eq!((cert.clone(), key.clone()), cert_paths());
    let first = fs::read(&cert).unwrap();

    ensure_self_signed_cert().expect("reuse");
    assert_eq!(first, fs::read(&cert).unwrap(), "certificate was regenerated");
    assert!(fs::read_to_string(&key).unwrap().contains("PRIVATE KEY"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&key).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
