//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use catalog_relay::config::{Credentials, RelayConfig};
use catalog_relay::http::HttpServer;

/// Canned token endpoint success body.
pub const TOKEN_OK: &str =
    r#"{"access_token":"test-token","token_type":"Bearer","expires_in":3600}"#;

/// A programmable mock upstream serving both the token endpoint (any path
/// under /token) and the catalog API, with per-surface call counting.
pub struct MockUpstream {
    pub addr: SocketAddr,
    token_calls: Arc<AtomicUsize>,
    api_calls: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }
}

/// Start a mock upstream on an ephemeral port. The responder sees
/// `(method, path-and-query)` for every request, token endpoint included.
pub async fn start_mock_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let token_calls = Arc::new(AtomicUsize::new(0));
    let api_calls = Arc::new(AtomicUsize::new(0));
    let (token_counter, api_counter) = (token_calls.clone(), api_calls.clone());
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let token_counter = token_counter.clone();
                    let api_counter = api_counter.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let mut read = 0;
                        loop {
                            match socket.read(&mut buf[read..]).await {
                                Ok(0) => break,
                                Ok(n) => {
                                    read += n;
                                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                    if read == buf.len() {
                                        break;
                                    }
                                }
                                Err(_) => return,
                            }
                        }

                        let head = String::from_utf8_lossy(&buf[..read]).to_string();
                        let mut parts = head.split_whitespace();
                        let method = parts.next().unwrap_or("").to_string();
                        let path = parts.next().unwrap_or("").to_string();

                        if path.starts_with("/token") {
                            token_counter.fetch_add(1, Ordering::SeqCst);
                        } else {
                            api_counter.fetch_add(1, Ordering::SeqCst);
                        }

                        let (status, body) = respond(&method, &path);
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream {
        addr,
        token_calls,
        api_calls,
    }
}

/// Start a relay wired to the given mock upstream, returning its address.
pub async fn start_relay(mock_addr: SocketAddr, credentials: Credentials) -> SocketAddr {
    let mut config = RelayConfig::default();
    config.upstream.api_base_url = format!("http://{}", mock_addr);
    config.upstream.token_url = format!("http://{}/token", mock_addr);
    config.credentials = credentials;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// Credentials accepted by the mock upstream.
pub fn test_credentials() -> Credentials {
    Credentials {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
    }
}
