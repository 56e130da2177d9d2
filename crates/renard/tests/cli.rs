#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/renard-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn renard(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_renard"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("RENARD_DEVICE")
        .env_remove("RENARD_BAUD")
        .output()
        .expect("renard should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

#[test]
fn encode_raw_writes_wire_bytes() {
    let output = renard(&["--format", "raw", "encode", "1", "0x7E", "255"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, vec![0x7E, 0x80, 0x01, 0x7F, 0x30, 0xFF]);
}

#[test]
fn encode_json_reports_escapes() {
    let output = renard(&["--format", "json", "encode", "0x7D", "0x7F", "16"]);

    assert_eq!(output.status.code(), Some(0));
    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], "encoded");
    assert_eq!(lines[0]["channel_count"], 3);
    assert_eq!(lines[0]["wire_size"], 7);
    assert_eq!(lines[0]["escaped"], 2);
    assert_eq!(lines[0]["frame"], "7E 80 7F 2F 7F 31 10");
}

#[test]
fn encode_from_file_uses_raw_bytes() {
    let dir = unique_temp_dir("encode-file");
    let path = dir.join("levels.bin");
    std::fs::write(&path, [0x00, 0x7E]).expect("levels file should be writable");

    let output = renard(&[
        "--format",
        "raw",
        "encode",
        "--file",
        path.to_str().expect("temp path should be UTF-8"),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, vec![0x7E, 0x80, 0x00, 0x7F, 0x30]);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn decode_hex_prints_frames_and_summary() {
    let output = renard(&[
        "--format",
        "json",
        "decode",
        "--channels",
        "3",
        "--hex",
        "7E 80 01 7F 30 FF 7E 80 02 7D 03 04",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "frame");
    assert_eq!(lines[0]["channels"], serde_json::json!([1, 126, 255]));
    assert_eq!(lines[1]["channels"], serde_json::json!([2, 3, 4]));
    assert_eq!(lines[2]["type"], "summary");
    assert_eq!(lines[2]["frames"], 2);
    assert_eq!(lines[2]["pads"], 1);
}

#[test]
fn decode_stdin_skips_garbage_and_aborted_frames() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_renard"))
        .args(["--log-level", "error", "--format", "json"])
        .args(["decode", "--channels", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("decode should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&[0x00, 0x13, 0x7E, 0x01, 0x7E, 0x80, 0x0A, 0x0B])
        .expect("stdin should accept capture");

    let output = child.wait_with_output().expect("decode should finish");
    assert_eq!(output.status.code(), Some(0));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["channels"], serde_json::json!([10, 11]));
    assert_eq!(lines[1]["aborted"], 1);
    assert_eq!(lines[1]["frames"], 1);
}

#[test]
fn decode_without_frames_is_data_invalid() {
    let output = renard(&["--format", "json", "decode", "--channels", "2", "--hex", "00 01 02"]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no complete frames"));
}

#[test]
fn decode_rejects_malformed_hex() {
    let output = renard(&["decode", "--channels", "1", "--hex", "7E 8"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn send_to_missing_device_fails() {
    let dir = unique_temp_dir("send-missing");
    let device = dir.join("ttyMISSING");

    let output = renard(&[
        "send",
        device.to_str().expect("temp path should be UTF-8"),
        "1",
        "2",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ttyMISSING"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn send_rejects_zero_bit_rate() {
    let output = renard(&["send", "/dev/null", "--baud", "0", "1"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = renard(&["version"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("renard {}", env!("CARGO_PKG_VERSION")));
}
