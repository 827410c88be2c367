//! An in-process stand-in for the weight daemon, speaking the exact wire
//! protocol of spec §6 over a real loopback TCP listener. Exists so
//! integration tests can drive `OracleClient` (and, transitively, the
//! selector hook and startup validator) without a separate process.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type EndpointError = (u16, String, String); // (status, error, code)

#[derive(Default)]
struct MockState {
    pong: bool,
    identity: Option<Result<(String, String, String), EndpointError>>,
    weights: HashMap<(String, String, u64), Result<u64, EndpointError>>,
    total_weights: HashMap<(u64, u64), Result<u64, EndpointError>>,
}

/// A running mock daemon. Drop or call [`MockDaemon::shutdown`] to stop it.
pub struct MockDaemon {
    pub port: u16,
    state: Arc<Mutex<MockState>>,
    handle: JoinHandle<()>,
}

impl MockDaemon {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let port = listener.local_addr().expect("local addr").port();

        let state = Arc::new(Mutex::new(MockState {
            pong: true,
            ..Default::default()
        }));

        let accept_state = state.clone();
        let handle = tokio::spawn(async move {
            loop {
                let (socket, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(_) => return,
                };
                let state = accept_state.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(socket, state).await;
                });
            }
        });

        MockDaemon { port, state, handle }
    }

    pub fn set_pong(&self, value: bool) {
        self.state.lock().pong = value;
    }

    pub fn set_identity_ok(&self, genesis_hash_b64: &str, protocol_version: &str, algorithm_version: &str) {
        self.state.lock().identity = Some(Ok((
            genesis_hash_b64.to_string(),
            protocol_version.to_string(),
            algorithm_version.to_string(),
        )));
    }

    pub fn set_identity_error(&self, status: u16, error: &str, code: &str) {
        self.state.lock().identity = Some(Err((status, error.to_string(), code.to_string())));
    }

    pub fn set_weight(&self, address: &str, selection_id: &str, balance_round: u64, weight: u64) {
        self.state
            .lock()
            .weights
            .insert((address.to_string(), selection_id.to_string(), balance_round), Ok(weight));
    }

    pub fn set_weight_error(&self, address: &str, selection_id: &str, balance_round: u64, status: u16, error: &str, code: &str) {
        self.state.lock().weights.insert(
            (address.to_string(), selection_id.to_string(), balance_round),
            Err((status, error.to_string(), code.to_string())),
        );
    }

    pub fn set_total_weight(&self, balance_round: u64, vote_round: u64, total_weight: u64) {
        self.state
            .lock()
            .total_weights
            .insert((balance_round, vote_round), Ok(total_weight));
    }

    pub fn set_total_weight_error(&self, balance_round: u64, vote_round: u64, status: u16, error: &str, code: &str) {
        self.state
            .lock()
            .total_weights
            .insert((balance_round, vote_round), Err((status, error.to_string(), code.to_string())));
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn handle_connection(
    mut socket: tokio::net::TcpStream,
    state: Arc<Mutex<MockState>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 1 << 20 {
            return Ok(());
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();

    let content_length: usize = lines
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = &buf[body_start..(body_start + content_length).min(buf.len())];
    let request: serde_json::Value = serde_json::from_slice(body).unwrap_or(json!({}));

    let (status, response) = dispatch(&path, &request, &state);
    let response_bytes = serde_json::to_vec(&response).unwrap_or_default();
    let reason = if status == 200 { "OK" } else { "Error" };
    let header = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response_bytes.len()
    );
    socket.write_all(header.as_bytes()).await?;
    socket.write_all(&response_bytes).await?;
    socket.flush().await?;
    Ok(())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn error_response((status, error, code): &EndpointError) -> (u16, serde_json::Value) {
    (*status, json!({ "error": error, "code": code }))
}

fn dispatch(
    path: &str,
    request: &serde_json::Value,
    state: &Arc<Mutex<MockState>>,
) -> (u16, serde_json::Value) {
    let state = state.lock();
    match path {
        "/ping" => (200, json!({ "pong": state.pong })),
        "/identity" => match &state.identity {
            Some(Ok((genesis, proto, algo))) => (
                200,
                json!({ "genesis_hash": genesis, "protocol_version": proto, "algorithm_version": algo }),
            ),
            Some(Err(e)) => error_response(e),
            None => (500, json!({ "error": "identity not configured", "code": "internal" })),
        },
        "/weight" => {
            let address = request.get("address").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let selection_id = request.get("selection_id").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let balance_round = request
                .get("balance_round")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0);
            match state.weights.get(&(address, selection_id, balance_round)) {
                Some(Ok(weight)) => (200, json!({ "weight": weight.to_string() })),
                Some(Err(e)) => error_response(e),
                None => (404, json!({ "error": "no such account", "code": "not_found" })),
            }
        }
        "/total_weight" => {
            let balance_round = request
                .get("balance_round")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0);
            let vote_round = request
                .get("vote_round")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0);
            match state.total_weights.get(&(balance_round, vote_round)) {
                Some(Ok(total)) => (200, json!({ "total_weight": total.to_string() })),
                Some(Err(e)) => error_response(e),
                None => (404, json!({ "error": "no such round", "code": "not_found" })),
            }
        }
        other => (404, json!({ "error": format!("unknown endpoint {other}"), "code": "not_found" })),
    }
}
