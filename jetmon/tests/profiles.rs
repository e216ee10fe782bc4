//! Tests for profile load/save and resolution logic (non-interactive paths only)
use std::fs;
use std::process::Command;
use std::sync::Mutex;

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn run_jetmon(args: &[&str]) -> (bool, String) {
    let exe = env!("CARGO_BIN_EXE_jetmon");
    let output = Command::new(exe).args(args).output().expect("run jetmon");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

fn fresh_config() -> tempfile::TempDir {
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    fs::create_dir_all(td.path().join("jetmon")).unwrap();
    td
}

fn profiles_path() -> std::path::PathBuf {
    jetmon::profiles::profiles_path()
}

#[test]
fn test_profile_created_on_first_use() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = fresh_config();
    let (ok, out) = run_jetmon(&["--profile", "unittest", "http://example:1", "--dry-run"]);
    assert!(ok, "{out}");
    let data = fs::read_to_string(profiles_path()).expect("profiles.json created");
    assert!(
        data.contains("unittest"),
        "profiles.json missing profile entry: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = fresh_config();
    let (_ok, _out) = run_jetmon(&["--profile", "prod", "http://one:5005", "--dry-run"]);
    let first = fs::read_to_string(profiles_path()).unwrap();
    let (_ok2, _out2) = run_jetmon(&["--profile", "prod", "http://one:5005", "--dry-run"]);
    let second = fs::read_to_string(profiles_path()).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");

    // changed without --save: dry run never prompts, so nothing is written
    let (_ok3, _out3) = run_jetmon(&["--profile", "prod", "http://two:5005", "--dry-run"]);
    assert_eq!(first, fs::read_to_string(profiles_path()).unwrap());

    let (_ok4, _out4) =
        run_jetmon(&["--profile", "prod", "--save", "http://two:5005", "--dry-run"]);
    let fourth = fs::read_to_string(profiles_path()).unwrap();
    assert!(fourth.contains("two"), "Updated URL not written: {fourth}");
}

#[test]
fn test_profile_tls_ca_and_interval_persisted() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = fresh_config();
    let (ok, out) = run_jetmon(&[
        "--profile",
        "secureX",
        "--tls-ca",
        "/tmp/cert.pem",
        "--interval",
        "7",
        "https://host:5005",
        "--dry-run",
    ]);
    assert!(ok, "{out}");
    let pf = jetmon::profiles::load_profiles();
    let entry = &pf.profiles["secureX"];
    assert_eq!(entry.tls_ca.as_deref(), Some("/tmp/cert.pem"));
    assert_eq!(entry.interval_secs, Some(7));
}

#[test]
fn test_loaded_profile_drives_dry_run() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = fresh_config();
    fs::write(
        profiles_path(),
        r#"{"profiles":{"orin":{"url":"http://orin.local:5005","interval_secs":9}},"version":0}"#,
    )
    .unwrap();
    let (ok, out) = run_jetmon(&["--profile", "orin", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("http://orin.local:5005/metrics every 9s"), "{out}");
}
