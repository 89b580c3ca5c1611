#![allow(dead_code)]
//! Scripted mock Proton engine for integration tests.
//!
//! Binds an ephemeral port, captures the raw request (head + body) for
//! assertion, and plays back a scripted HTTP response: optional header
//! stall, then body chunks interleaved with delays, then close. The body
//! is close-delimited (`Connection: close`, no Content-Length), matching
//! how a streaming engine terminates an unbounded response.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// One scripted action after response headers are on the wire.
pub enum Step {
    /// Write these bytes and flush.
    Send(&'static str),
    /// Pause this many milliseconds before the next step.
    Delay(u64),
}

/// Response script for one exchange.
pub struct Script {
    pub status: u16,
    /// Milliseconds to stall before sending response headers.
    pub headers_delay_ms: u64,
    pub steps: Vec<Step>,
}

impl Script {
    /// 2xx response streaming the given body steps.
    pub fn ok(steps: Vec<Step>) -> Self {
        Self {
            status: 200,
            headers_delay_ms: 0,
            steps,
        }
    }

    /// Non-success response with a plain error body.
    pub fn error(status: u16, body: &'static str) -> Self {
        Self {
            status,
            headers_delay_ms: 0,
            steps: vec![Step::Send(body)],
        }
    }

    /// Accepts the connection but stalls before headers.
    pub fn stalled(headers_delay_ms: u64) -> Self {
        Self {
            status: 200,
            headers_delay_ms,
            steps: Vec::new(),
        }
    }
}

pub struct MockEngine {
    pub port: u16,
    /// Resolves with the raw request (head + body) once received.
    pub request_rx: oneshot::Receiver<String>,
}

/// Spawn a mock engine serving exactly one exchange per the script.
pub async fn spawn_engine(script: Script) -> MockEngine {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock engine");
    let port = listener.local_addr().expect("local addr").port();
    let (request_tx, request_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let request = read_request(&mut socket).await;
        let _ = request_tx.send(request);

        if script.headers_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(script.headers_delay_ms)).await;
        }

        let reason = if (200..300).contains(&script.status) {
            "OK"
        } else {
            "Error"
        };
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n",
            script.status, reason
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }

        for step in script.steps {
            match step {
                Step::Send(data) => {
                    // Client may already have aborted; broken pipe is fine.
                    if socket.write_all(data.as_bytes()).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                },
                Step::Delay(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            }
        }
        let _ = socket.shutdown().await;
    });

    MockEngine { port, request_rx }
}

/// Read one HTTP request: head up to the blank line, then Content-Length
/// bytes of body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];
    loop {
        let n = match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&tmp[..n]);
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = content_length(&head);
            if buf.len() - (head_end + 4) >= content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
