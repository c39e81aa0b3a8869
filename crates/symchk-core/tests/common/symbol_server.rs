//! Minimal HTTP/1.1 symbol server for integration tests.
//!
//! Serves a fixed path → body map with 200 and everything else with 404.
//! Every request path is recorded. Optionally answers the first N requests
//! with 503 to exercise throttling.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub struct SymbolServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl SymbolServer {
    /// Starts serving `files` (paths like `/ntdll.pdb/<ID>/ntdll.pdb`).
    pub fn start(files: &[(&str, Vec<u8>)]) -> Self {
        Self::start_throttled(files, 0)
    }

    /// Like `start`, but the first `throttled` requests get 503.
    pub fn start_throttled(files: &[(&str, Vec<u8>)], throttled: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let files: Arc<HashMap<String, Vec<u8>>> = Arc::new(
            files
                .iter()
                .map(|(p, b)| (p.to_string(), b.clone()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let remaining_503 = Arc::new(AtomicUsize::new(throttled));
        {
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let files = Arc::clone(&files);
                    let requests = Arc::clone(&requests);
                    let remaining_503 = Arc::clone(&remaining_503);
                    thread::spawn(move || handle(stream, &files, &requests, &remaining_503));
                }
            });
        }
        Self {
            base: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(
    mut stream: TcpStream,
    files: &HashMap<String, Vec<u8>>,
    requests: &Mutex<Vec<String>>,
    remaining_503: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("").to_string();
    requests.lock().unwrap().push(path.clone());

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let throttle = remaining_503
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if throttle {
        let _ = stream.write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    match files.get(&path) {
        Some(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
}
