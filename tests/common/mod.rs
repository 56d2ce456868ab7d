// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use flowrank::{CanonicalTicker, FlowError, HttpSession, Notifier, Result, SourceAdapter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub fn test_session() -> HttpSession {
    HttpSession::new(Duration::from_secs(5), 100, 100).unwrap()
}

pub fn tickers(source: &str, rows: &[(&str, f64)]) -> Vec<CanonicalTicker> {
    rows.iter()
        .map(|(symbol, metric)| CanonicalTicker::new(source, *symbol, *metric))
        .collect()
}

/// Returns the same tickers every cycle.
pub struct FixedAdapter {
    pub name: String,
    pub tickers: Vec<CanonicalTicker>,
    pub calls: AtomicUsize,
}

impl FixedAdapter {
    pub fn new(name: &str, rows: &[(&str, f64)]) -> Self {
        FixedAdapter {
            name: name.to_string(),
            tickers: tickers(name, rows),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SourceAdapter for FixedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tickers.clone())
    }
}

/// Always fails as if the venue were down.
pub struct FailingAdapter {
    pub name: String,
}

impl FailingAdapter {
    pub fn new(name: &str) -> Self {
        FailingAdapter { name: name.to_string() }
    }
}

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        Err(FlowError::unavailable(&self.name, "HTTP 503 Service Unavailable"))
    }
}

/// Answers only after `delay`.
pub struct SlowAdapter {
    pub name: String,
    pub delay: Duration,
    pub rows: Vec<(String, f64)>,
}

#[async_trait]
impl SourceAdapter for SlowAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        tokio::time::sleep(self.delay).await;
        Ok(self
            .rows
            .iter()
            .map(|(symbol, metric)| CanonicalTicker::new(self.name.as_str(), symbol.as_str(), *metric))
            .collect())
    }
}

pub struct PanickingAdapter;

#[async_trait]
impl SourceAdapter for PanickingAdapter {
    fn name(&self) -> &str {
        "panicky"
    }

    async fn fetch(&self, _session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        panic!("unexpected payload");
    }
}

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Counts attempts and always fails.
#[derive(Default)]
pub struct FailingNotifier {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _text: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(FlowError::Notify("chat not found".to_string()))
    }
}

/// Canned reply for one request target (path plus query).
#[derive(Clone)]
pub struct Route {
    pub target: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(target: &str, status: u16, body: impl Into<String>) -> Self {
        Route {
            target: target.to_string(),
            status,
            body: body.into(),
        }
    }
}

/// Serves `routes` over plain HTTP/1.1 on a local port and returns its base URL.
/// Unknown targets get a 404.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(respond(stream, routes));
        }
    });
    format!("http://{}", addr)
}

async fn respond(mut stream: TcpStream, routes: Vec<Route>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let target = head.split_whitespace().nth(1).unwrap_or_default().to_string();
    let (status, body) = routes
        .iter()
        .find(|r| r.target == target)
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or((404, "not found".to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
