//! Test support for HTTP-level integration and behavioural tests.
//!
//! The library under test is blocking, so each test owns a `tokio` runtime
//! only to start the `wiremock` server and mount responses; requests are
//! then issued from the test thread with the real `ureq` transport.

#![allow(dead_code, reason = "each test crate uses a subset of the helpers")]

use camino::Utf8PathBuf;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the fixture listing is served from.
pub const LISTING_PATH: &str = "/dl/";

/// A local HTTP server with the runtime that drives it.
pub struct TestServer {
    runtime: tokio::runtime::Runtime,
    server: MockServer,
}

impl TestServer {
    /// Start a server on a random local port.
    pub fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    /// Absolute URL of `url_path` on this server.
    pub fn url(&self, url_path: &str) -> String {
        format!("{}{url_path}", self.server.uri())
    }

    /// Absolute URL of the listing.
    pub fn listing_url(&self) -> String {
        self.url(LISTING_PATH)
    }

    /// Answer GET `url_path` with `status` and `body`.
    pub fn serve(&self, url_path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.mount(url_path, ResponseTemplate::new(status).set_body_bytes(body.into()));
    }

    /// Answer GET `url_path` with `body` after `delay`.
    pub fn serve_slowly(&self, url_path: &str, body: impl Into<Vec<u8>>, delay: Duration) {
        self.mount(
            url_path,
            ResponseTemplate::new(200)
                .set_body_bytes(body.into())
                .set_delay(delay),
        );
    }

    /// Serve `html` as the listing page.
    pub fn serve_listing(&self, html: &str) {
        self.mount(
            LISTING_PATH,
            ResponseTemplate::new(200).set_body_raw(html.to_owned(), "text/html; charset=utf-8"),
        );
    }

    /// Number of requests received for `url_path` so far.
    pub fn hits(&self, url_path: &str) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == url_path)
            .count()
    }

    fn mount(&self, url_path: &str, response: ResponseTemplate) {
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path(url_path))
                .respond_with(response)
                .mount(&self.server),
        );
    }
}

/// Answer one GET on a raw socket with a declared `Content-Length` and the
/// given body chunks, pausing before each chunk, then close the connection.
///
/// A declared length larger than the chunks sent produces a truncated body.
/// Returns the URL of `url_path` on the socket.
pub fn serve_chunked_once(
    url_path: &str,
    content_length: usize,
    chunks: Vec<Vec<u8>>,
    pause: Duration,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local socket");
    let addr = listener.local_addr().expect("local address");
    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request: Vec<u8> = Vec::new();
        let mut buffer = [0u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => return,
                Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
            }
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
        );
        if stream.write_all(head.as_bytes()).is_err() {
            return;
        }
        for chunk in chunks {
            std::thread::sleep(pause);
            if stream.write_all(&chunk).and_then(|()| stream.flush()).is_err() {
                return;
            }
        }
    });
    format!("http://{addr}{url_path}")
}

/// A temporary directory addressed with a UTF-8 path.
pub fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
    (dir, path)
}
