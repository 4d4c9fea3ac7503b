//! Test harness: a server on an ephemeral port and a minimal HTTP/1.1 client.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use httpbench_core::error::Result;
use httpbench_server::app_state::AppState;
use httpbench_server::config::ServerSection;
use httpbench_server::{shutdown_channel, LifecycleState, Server, ShutdownHandle};

pub struct Running {
    pub addr: SocketAddr,
    pub state: AppState,
    pub shutdown: ShutdownHandle,
    pub lifecycle: watch::Receiver<LifecycleState>,
    pub task: JoinHandle<Result<()>>,
}

impl Running {
    /// Trigger shutdown and wait (bounded) for `serve` to return.
    pub async fn stop(mut self) -> Result<()> {
        self.shutdown.trigger();
        let out = tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("shutdown did not complete in time")
            .expect("serve task panicked");
        assert_eq!(*self.lifecycle.borrow_and_update(), LifecycleState::Stopped);
        out
    }
}

pub async fn start(workers: usize) -> Running {
    start_with(ServerSection {
        workers,
        ..local()
    })
    .await
}

/// Defaults bound to an ephemeral loopback port.
pub fn local() -> ServerSection {
    ServerSection {
        host: "127.0.0.1".into(),
        port: 0,
        ..ServerSection::default()
    }
}

pub async fn start_with(cfg: ServerSection) -> Running {
    let server = Server::bind(cfg).await.expect("bind");
    let addr = server.local_addr();
    let state = server.state().clone();
    let mut lifecycle = server.subscribe();

    let (shutdown, signal) = shutdown_channel();
    let task = tokio::spawn(server.serve(signal.wait()));

    lifecycle
        .wait_for(|s| *s >= LifecycleState::Listening)
        .await
        .expect("lifecycle");

    Running {
        addr,
        state,
        shutdown,
        lifecycle,
        task,
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

/// One request per connection (`Connection: close`).
pub async fn request(addr: SocketAddr, method: &str, path: &str) -> HttpResponse {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.expect("write");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read");
    parse(&raw)
}

pub async fn get(addr: SocketAddr, path: &str) -> HttpResponse {
    request(addr, "GET", path).await
}

/// Connect and send only `head` of a request; the server is left waiting
/// for the rest of the header block.
pub async fn send_partial(addr: SocketAddr, head: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(head.as_bytes()).await.expect("write");
    stream
}

/// Send the rest of a request started with `send_partial` and read the reply.
pub async fn finish(mut stream: TcpStream, rest: &str) -> HttpResponse {
    stream.write_all(rest.as_bytes()).await.expect("write");
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read");
    parse(&raw)
}

fn parse(raw: &[u8]) -> HttpResponse {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    let head = std::str::from_utf8(&raw[..split]).expect("utf8 head");
    let body = raw[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("status line");

    let content_type = lines.find_map(|l| {
        let (k, v) = l.split_once(':')?;
        k.eq_ignore_ascii_case("content-type")
            .then(|| v.trim().to_string())
    });

    HttpResponse {
        status,
        content_type,
        body,
    }
}
