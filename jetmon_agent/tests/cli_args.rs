//! CLI arg parsing tests for jetmon_agent (server)
use std::process::Command;

#[test]
fn test_help_and_port_short_long() {
    let exe = env!("CARGO_BIN_EXE_jetmon_agent");

    let out = Command::new(exe).arg("--help").output().expect("run agent");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stderr);
    assert!(
        text.contains("--port") && text.contains("-p") && text.contains("--interval-ms"),
        "help text missing expected flags\n{text}"
    );

    // Long --port: the agent starts (then we kill quickly). Ephemeral port avoids conflicts.
    let mut child = Command::new(exe)
        .args(["--bind", "127.0.0.1", "--port", "0"])
        .spawn()
        .expect("spawn agent");
    std::thread::sleep(std::time::Duration::from_millis(150));
    assert!(child.try_wait().expect("poll agent").is_none(), "agent exited early");
    let _ = child.kill();
    let _ = child.wait();

    // Short -p
    let mut child2 = Command::new(exe)
        .args(["--bind", "127.0.0.1", "-p", "0"])
        .spawn()
        .expect("spawn agent");
    std::thread::sleep(std::time::Duration::from_millis(150));
    assert!(child2.try_wait().expect("poll agent").is_none(), "agent exited early");
    let _ = child2.kill();
    let _ = child2.wait();
}

#[test]
fn test_bad_port_exits_with_error() {
    let out = Command::new(env!("CARGO_BIN_EXE_jetmon_agent"))
        .args(["--port", "not-a-port"])
        .output()
        .expect("run agent");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid port"));
}
