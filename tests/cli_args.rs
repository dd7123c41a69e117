use std::process::Command;

#[test]
fn missing_port_prints_usage_and_exits_cleanly() {
    let out = Command::new(env!("CARGO_BIN_EXE_groupmesh"))
        .output()
        .expect("binary should run");
    assert!(out.status.success(), "expected exit status 0");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(text.contains("Usage"), "usage not shown: {}", text);
}

#[test]
fn invalid_port_value_signals_failure() {
    let out = Command::new(env!("CARGO_BIN_EXE_groupmesh"))
        .arg("not-a-port")
        .output()
        .expect("binary should run");
    assert!(!out.status.success());
}
