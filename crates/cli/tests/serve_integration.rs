//! Integration tests for the `commitment serve` HTTP form service.
//!
//! Each test starts the server as a child process on a unique port with its
//! own data directory, makes HTTP requests, and verifies the responses.

use std::io::Read;
use std::net::TcpStream;
use std::path::Path;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use tempfile::TempDir;

/// Atomic port counter to avoid port conflicts between parallel tests.
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);
static PORT_INIT: std::sync::Once = std::sync::Once::new();

fn next_port() -> u16 {
    PORT_INIT.call_once(|| {
        let base = 20000 + (std::process::id() as u16 % 20000);
        NEXT_PORT.store(base, Ordering::SeqCst);
    });
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// Helper: start the form service on `port`, storing under `data_dir`.
fn start_server(port: u16, data_dir: &Path, reset_delay_ms: u64) -> Child {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_commitment"));
    cmd.arg("serve").arg("--port").arg(port.to_string());
    cmd.env("COMMITMENT_DATA_DIR", data_dir)
        .env("COMMITMENT_IMGBB_API_KEY", "demo-key")
        .env("COMMITMENT_WEBHOOK_URL", "http://127.0.0.1:9/hook")
        .env("COMMITMENT_RESET_DELAY_MS", reset_delay_ms.to_string())
        .env_remove("COMMITMENT_STORAGE_QUOTA")
        .env("RUST_LOG", "error");
    cmd.stdout(std::process::Stdio::null());
    cmd.stderr(std::process::Stdio::null());

    let child = cmd.spawn().expect("failed to start commitment serve");
    // Wait for server to be ready by polling the port
    for _ in 0..50 {
        if TcpStream::connect(format!("127.0.0.1:{}", port)).is_ok() {
            return child;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    child
}

/// Helper: send a raw request and return (status, body).
fn http_request(port: u16, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
    http_request_with_headers(port, method, path, &[], body)
}

/// Helper: like [`http_request`] with extra request headers.
fn http_request_with_headers(
    port: u16,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();

    let extra: String = headers
        .iter()
        .map(|(name, value)| format!("{}: {}\r\n", name, value))
        .collect();
    let request = match body {
        Some(body) => format!(
            "{} {} HTTP/1.1\r\nHost: localhost:{}\r\n{}Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            method, path, port, extra, body.len(), body
        ),
        None => format!(
            "{} {} HTTP/1.1\r\nHost: localhost:{}\r\n{}Connection: close\r\n\r\n",
            method, path, port, extra
        ),
    };
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);

    parse_http_response(&response)
}

fn http_get(port: u16, path: &str) -> (u16, String) {
    http_request(port, "GET", path, None)
}

fn http_post(port: u16, path: &str, body: &str) -> (u16, String) {
    http_request(port, "POST", path, Some(body))
}

fn http_delete(port: u16, path: &str) -> (u16, String) {
    http_request(port, "DELETE", path, None)
}

/// Parse an HTTP response into (status_code, body).
fn parse_http_response(response: &str) -> (u16, String) {
    let parts: Vec<&str> = response.splitn(2, "\r\n\r\n").collect();
    let headers = parts.first().unwrap_or(&"").to_string();
    let body = parts.get(1).unwrap_or(&"").to_string();

    let status_line = headers.lines().next().unwrap_or("");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    let body = if headers
        .to_ascii_lowercase()
        .contains("transfer-encoding: chunked")
    {
        decode_chunked(&body)
    } else {
        body
    };

    (status, body)
}

/// Decode chunked transfer encoding.
fn decode_chunked(data: &str) -> String {
    let mut result = String::new();
    let mut remaining = data;

    while let Some(line_end) = remaining.find("\r\n") {
        let size = match usize::from_str_radix(remaining[..line_end].trim(), 16) {
            Ok(s) => s,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + size;
        if chunk_end > remaining.len() {
            result.push_str(&remaining[chunk_start..]);
            break;
        }
        result.push_str(&remaining[chunk_start..chunk_end]);
        remaining = if chunk_end + 2 <= remaining.len() {
            &remaining[chunk_end + 2..]
        } else {
            ""
        };
    }

    result
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON {:?}: {}", body, e))
}

const STROKE_SUBMISSION: &str = r#"{
    "fullName": "Ahmad",
    "position": "Teller",
    "strokes": {"width": 600, "height": 160, "strokes": [[{"x": 10, "y": 10}, {"x": 150, "y": 80}]]}
}"#;

#[test]
fn health_and_page_are_served() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 3000);

    let (status, body) = http_get(port, "/health");
    assert_eq!(status, 200);
    assert_eq!(json(&body)["status"], "ok");

    let (status, body) = http_get(port, "/");
    assert_eq!(status, 200);
    assert!(body.contains("<canvas"));
    assert!(body.contains("Dengan Rahmat Tuhan"));

    let (status, body) = http_get(port, "/commitment");
    assert_eq!(status, 200);
    assert!(json(&body)["text"]
        .as_str()
        .unwrap()
        .contains("pegawai militan"));

    let (status, body) = http_get(port, "/nope");
    assert_eq!(status, 404);
    assert_eq!(json(&body)["error"], "not found");

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn submit_list_show_delete_round() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 3000);

    let (status, body) = http_post(port, "/submissions", STROKE_SUBMISSION);
    assert_eq!(status, 201, "body: {}", body);
    let report = json(&body);
    let id = report["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("form_"));
    assert_eq!(report["record"]["fullName"], "Ahmad");
    assert_eq!(report["upload"]["outcome"], "degraded");

    let (status, body) = http_get(port, "/status");
    assert_eq!(status, 200);
    let state = json(&body);
    assert_eq!(state["state"], "succeeded");
    assert_eq!(state["id"], id.as_str());

    let (status, body) = http_get(port, "/submissions");
    assert_eq!(status, 200);
    let list = json(&body);
    assert_eq!(list["submissions"].as_array().unwrap().len(), 1);
    assert_eq!(list["submissions"][0]["id"], id.as_str());

    let (status, body) = http_get(port, &format!("/submissions/{}", id));
    assert_eq!(status, 200);
    assert_eq!(json(&body)["position"], "Teller");

    let (status, _) = http_delete(port, &format!("/submissions/{}", id));
    assert_eq!(status, 200);

    let (status, body) = http_delete(port, &format!("/submissions/{}", id));
    assert_eq!(status, 404);
    assert!(json(&body)["error"].as_str().unwrap().contains("not found"));

    let (status, _) = http_get(port, &format!("/submissions/{}", id));
    assert_eq!(status, 404);

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn validation_failures_return_422() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 3000);

    let (status, body) = http_post(
        port,
        "/submissions",
        r#"{"fullName": "", "position": "Teller", "signature": "data:image/png;base64,AAAA"}"#,
    );
    assert_eq!(status, 422);
    assert_eq!(json(&body)["error"], "field fullName is required");

    let (status, body) = http_post(
        port,
        "/submissions",
        r#"{"fullName": "Ahmad", "position": "Teller", "strokes": {"strokes": []}}"#,
    );
    assert_eq!(status, 422);
    assert_eq!(json(&body)["error"], "digital signature is required");

    let (status, body) = http_get(port, "/status");
    assert_eq!(status, 200);
    let state = json(&body);
    assert_eq!(state["state"], "failed");
    assert_eq!(state["kind"], "validation");

    let (_, body) = http_get(port, "/submissions");
    assert!(json(&body)["submissions"].as_array().unwrap().is_empty());

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn malformed_body_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 3000);

    let (status, body) = http_post(port, "/submissions", "not json");
    assert!(status == 400 || status == 422, "status: {}", status);
    assert!(json(&body)["error"].is_string());

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn success_resets_to_idle_after_delay() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 200);

    let (status, _) = http_post(port, "/submissions", STROKE_SUBMISSION);
    assert_eq!(status, 201);

    std::thread::sleep(Duration::from_millis(1000));
    let (_, body) = http_get(port, "/status");
    assert_eq!(json(&body)["state"], "idle");

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn touch_devices_get_the_modal_pad() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 1500);

    let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    let (status, body) =
        http_request_with_headers(port, "GET", "/", &[("User-Agent", iphone)], None);
    assert_eq!(status, 200);
    assert!(body.contains(r#"id="open-pad">Tanda Tangan</button>"#));
    assert!(body.contains(r#"id="pad-modal""#));
    assert!(body.contains("const RESET_DELAY_MS = 1500;"));

    let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/128.0 Safari/537.36";
    let (status, body) =
        http_request_with_headers(port, "GET", "/", &[("User-Agent", desktop)], None);
    assert_eq!(status, 200);
    assert!(body.contains(r#"<canvas id="pad""#));
    assert!(!body.contains(r#"id="pad-modal""#));
    assert!(!body.contains(r#"id="open-pad""#));

    child.kill().ok();
    child.wait().ok();
}

#[test]
fn out_of_range_strokes_return_400() {
    let dir = TempDir::new().unwrap();
    let port = next_port();
    let mut child = start_server(port, dir.path(), 3000);

    let (status, body) = http_post(
        port,
        "/submissions",
        r#"{"fullName": "Ahmad", "position": "Teller",
            "strokes": {"width": 0, "height": 160, "strokes": [[{"x": 1, "y": 1}]]}}"#,
    );
    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap()
        .contains("invalid drawing surface 0x160"));

    let (status, body) = http_post(
        port,
        "/submissions",
        r#"{"fullName": "Ahmad", "position": "Teller",
            "strokes": {"width": 4096, "height": 4096, "strokes": [[{"x": 1, "y": 1}]]}}"#,
    );
    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap()
        .contains("exceeds 600x160"));

    let points = vec![r#"{"x": 5, "y": 5}"#; 5000].join(",");
    let long = format!(
        r#"{{"fullName": "Ahmad", "position": "Teller", "strokes": {{"strokes": [[{}]]}}}}"#,
        points
    );
    let (status, body) = http_post(port, "/submissions", &long);
    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap()
        .contains("5000 points"));

    let (_, body) = http_get(port, "/submissions");
    assert!(json(&body)["submissions"].as_array().unwrap().is_empty());

    child.kill().ok();
    child.wait().ok();
}
