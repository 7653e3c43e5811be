mod support_single;

use std::fs;
use std::process::Output;

use tempfile::tempdir;

use support_single::{run_swipeload, spawn_http_server_or_skip};

const CREATED: &str = "HTTP/1.1 201 Created";
const SERVER_ERROR: &str = "HTTP/1.1 500 Internal Server Error";

fn ensure_success(output: &Output) -> Result<String, String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(stdout)
}

#[test]
fn e2e_single_cli_basic() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip(CREATED)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = vec![
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "20".to_owned(),
        "-w".to_owned(),
        "4".to_owned(),
        "--timeout".to_owned(),
        "5s".to_owned(),
    ];

    let stdout = ensure_success(&run_swipeload(dir.path(), args)?)?;
    if !stdout.contains("Total Requests: 20") || !stdout.contains("Successful: 20 (100.00%)") {
        return Err(format!("unexpected summary:\n{}", stdout));
    }
    if server.hits() != 20 {
        return Err(format!("server saw {} requests", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_single_exports() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(CREATED)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let export_csv = dir.path().join("samples.csv");
    let export_throughput = dir.path().join("throughput.csv");
    let export_json = dir.path().join("report.json");

    let args = vec![
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "12".to_owned(),
        "-w".to_owned(),
        "3".to_owned(),
        "--export-csv".to_owned(),
        export_csv.to_string_lossy().into_owned(),
        "--export-throughput-csv".to_owned(),
        export_throughput.to_string_lossy().into_owned(),
        "--export-json".to_owned(),
        export_json.to_string_lossy().into_owned(),
    ];
    ensure_success(&run_swipeload(dir.path(), args)?)?;

    let csv = fs::read_to_string(&export_csv).map_err(|err| format!("read csv failed: {}", err))?;
    let mut lines = csv.lines();
    if lines.next() != Some("elapsed_ms,latency_ms,success,attempts") {
        return Err(format!("unexpected csv header:\n{}", csv));
    }
    if lines.count() != 12 {
        return Err(format!("expected 12 csv rows:\n{}", csv));
    }

    let throughput = fs::read_to_string(&export_throughput)
        .map_err(|err| format!("read throughput failed: {}", err))?;
    if !throughput.starts_with("time,throughput\n1,") {
        return Err(format!("unexpected throughput csv:\n{}", throughput));
    }

    let json =
        fs::read_to_string(&export_json).map_err(|err| format!("read json failed: {}", err))?;
    let value: serde_json::Value =
        serde_json::from_str(&json).map_err(|err| format!("parse json failed: {}", err))?;
    let success = value
        .get("summary")
        .and_then(|summary| summary.get("success_count"))
        .and_then(serde_json::Value::as_u64);
    if success != Some(12) {
        return Err(format!("unexpected json summary: {}", json));
    }
    Ok(())
}

#[test]
fn e2e_rejected_status_is_not_retried() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip(SERVER_ERROR)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = vec![
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "5".to_owned(),
        "-w".to_owned(),
        "2".to_owned(),
        "--backoff-jitter-ms".to_owned(),
        "0".to_owned(),
    ];

    let stdout = ensure_success(&run_swipeload(dir.path(), args)?)?;
    if !stdout.contains("Errors: 5") {
        return Err(format!("unexpected summary:\n{}", stdout));
    }
    if server.hits() != 5 {
        return Err(format!("expected one attempt per request, saw {}", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_config_file_in_working_directory() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip(CREATED)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = format!("url = \"{}\"\nrequests = 3\nworkers = 1\n", url);
    fs::write(dir.path().join("swipeload.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let no_args: [&str; 0] = [];
    ensure_success(&run_swipeload(dir.path(), no_args)?)?;
    if server.hits() != 3 {
        return Err(format!("server saw {} requests", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_missing_url_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_swipeload(dir.path(), ["-n", "1"])?;
    if output.status.success() {
        return Err("expected a failure without a server URL".to_owned());
    }
    Ok(())
}
