use reqwest::blocking::Client;
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

fn find_free_port() -> u16 {
    TcpListener::bind(("127.0.0.1", 0))
        .expect("bind probe port")
        .local_addr()
        .expect("local addr")
        .port()
}

fn wait_for_status(client: &Client, port: u16) {
    let url = format!("http://127.0.0.1:{}/status", port);
    for _ in 0..60 {
        if let Ok(resp) = client.get(&url).send() {
            if resp.status().is_success() {
                return;
            }
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("soulbrowser did not become ready on port {}", port);
}

#[test]
fn run_automation_rejects_empty_request_over_http() {
    let port = find_free_port();
    let bin = assert_cmd::cargo::cargo_bin!("soulbrowser");
    let mut child = Command::new(bin)
        .args(["--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn soulbrowser");

    let client = Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client");

    wait_for_status(&client, port);

    let response = client
        .post(format!("http://127.0.0.1:{}/api/run-automation", port))
        .json(&serde_json::json!({}))
        .send()
        .expect("request success");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().expect("json body");
    assert!(body["error"].as_str().is_some());

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn run_automation_returns_not_found_for_unknown_test_case() {
    let port = find_free_port();
    let bin = assert_cmd::cargo::cargo_bin!("soulbrowser");
    let mut child = Command::new(bin)
        .args(["--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn soulbrowser");

    let client = Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client");

    wait_for_status(&client, port);

    let response = client
        .post(format!("http://127.0.0.1:{}/api/run-automation", port))
        .json(&serde_json::json!({ "testCaseId": "does-not-exist" }))
        .send()
        .expect("request success");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let _ = child.kill();
    let _ = child.wait();
}
