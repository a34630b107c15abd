//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use fetch_loader::http::{BoxError, ResponseHead, Transport, TransportRequest, TransportResponse};
use fetch_loader::resilience::AbortError;

/// Canned response served by the mock backend for one path.
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: Option<&'static str>,
    pub body: String,
    pub delay: Duration,
}

impl MockRoute {
    pub fn new(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            content_type: None,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok(content_type: &'static str, body: impl Into<String>) -> Self {
        Self::new(200, "OK")
            .with_content_type(content_type)
            .with_body(body)
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Handle to a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Raw request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock HTTP/1.1 backend on an ephemeral port.
///
/// Requests are routed by path (query string ignored); unknown paths get a
/// `404 Not Found` with an HTML body.
pub async fn start_backend(routes: Vec<(&'static str, MockRoute)>) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<&'static str, MockRoute>> = Arc::new(routes.into_iter().collect());
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let routes = routes.clone();
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        serve(socket, &routes, &seen).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, requests }
}

async fn serve(
    mut socket: TcpStream,
    routes: &HashMap<&'static str, MockRoute>,
    seen: &Mutex<Vec<String>>,
) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let target = head.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    seen.lock().unwrap().push(head.clone());

    let route = routes.get(path.as_str()).cloned().unwrap_or_else(|| {
        MockRoute::new(404, "Not Found")
            .with_content_type("text/html")
            .with_body("<html><body>not found</body></html>")
    });

    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let mut response = format!("HTTP/1.1 {} {}\r\n", route.status, route.reason);
    if let Some(content_type) = route.content_type {
        response.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.body.len(),
        route.body
    ));

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// What a [`ScriptedTransport`] does when issued.
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer immediately with a buffered response.
    Respond {
        status: StatusCode,
        content_type: Option<&'static str>,
        body: Bytes,
    },
    /// Never answer; only the signal ends the call.
    Hang,
    /// Fail with an I/O error of the given kind.
    Fail(std::io::ErrorKind),
}

/// In-memory transport counting calls and observed cancellations.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    script: Script,
    calls: Arc<AtomicUsize>,
    cancellations: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            cancellations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn responding(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        Self::new(Script::Respond {
            status,
            content_type: Some(content_type),
            body: Bytes::from_static(body.as_bytes()),
        })
    }

    pub fn hanging() -> Self {
        Self::new(Script::Hang)
    }

    pub fn failing(kind: std::io::ErrorKind) -> Self {
        Self::new(Script::Fail(kind))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// How many issued calls saw their signal cancelled.
    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn issue(
        &self,
        request: TransportRequest,
        signal: CancellationToken,
    ) -> Result<TransportResponse, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let watched = signal.clone();
        let cancellations = self.cancellations.clone();
        tokio::spawn(async move {
            watched.cancelled().await;
            cancellations.fetch_add(1, Ordering::SeqCst);
        });

        match &self.script {
            Script::Respond {
                status,
                content_type,
                body,
            } => {
                let mut head = ResponseHead::new(*status, request.url);
                if let Some(content_type) = content_type {
                    head.headers
                        .insert(CONTENT_TYPE, HeaderValue::from_static(*content_type));
                }
                Ok(TransportResponse::buffered(head, body.clone()))
            }
            Script::Hang => {
                signal.cancelled().await;
                Err(Box::new(AbortError))
            }
            Script::Fail(kind) => Err(Box::new(std::io::Error::new(*kind, "scripted failure"))),
        }
    }
}

/// Give spawned watchers a chance to run.
pub async fn settle_background() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
