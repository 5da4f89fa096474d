//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every request with a fixed status and body, optionally after a
//! delay, and closes the connection afterwards. Tracks how many requests
//! are being handled at the same time.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
    /// Delay applied to the very first request instead of `delay`.
    pub first_delay: Option<Duration>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            body: b"hello world".to_vec(),
            delay: Duration::ZERO,
            first_delay: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ServerStats {
    pub hits: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

pub struct TestServer {
    pub url: String,
    pub stats: Arc<ServerStats>,
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(ServerStats::default());
    let opts = Arc::new(opts);
    {
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let stats = Arc::clone(&stats);
                let opts = Arc::clone(&opts);
                thread::spawn(move || handle(stream, &opts, &stats));
            }
        });
    }
    TestServer {
        url: format!("http://127.0.0.1:{}/", port),
        stats,
    }
}

/// A url nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, opts: &ServerOptions, stats: &ServerStats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    if !read_head(&mut stream) {
        return;
    }

    let hit = stats.hits.fetch_add(1, Ordering::SeqCst);
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let delay = match opts.first_delay {
        Some(first) if hit == 0 => first,
        _ => opts.delay,
    };
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    // released before answering so the client can never observe more
    // in-flight requests than the server counted
    stats.in_flight.fetch_sub(1, Ordering::SeqCst);

    let head = format!(
        "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        opts.status,
        opts.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&opts.body);
    let _ = stream.flush();
}

/// Reads until the end of the request head. Returns false on a dead socket.
fn read_head(stream: &mut TcpStream) -> bool {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return false,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    true
}
