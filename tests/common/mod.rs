//! Shared helpers for the integration tests.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use jurl::{ExecutionContext, Request, RequestExecutor, Response};

/// Runs the blocking executor off the async test runtime.
#[allow(dead_code)]
pub async fn execute(request: Request) -> jurl::Result<Response> {
    tokio::task::spawn_blocking(move || ExecutionContext::new()?.execute(&request))
        .await
        .expect("executor thread panicked")
}

/// A local url nothing is listening on.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

/// Serves one connection: reads the request head, writes `raw` as the whole
/// reply and closes. For replies a well behaved mock server will not send.
#[allow(dead_code)]
pub fn serve_raw_once(raw: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        let _ = stream.write_all(raw);
    });
    format!("http://127.0.0.1:{}/", port)
}
