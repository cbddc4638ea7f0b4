//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use dd_oa_list_download::Config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// In-process stand-in for a Redis server.
///
/// Answers `PING` with `+PONG` and every other command with `+OK`, or stays
/// silent when built with [`FakeRedis::silent`].
#[derive(Debug, Clone)]
pub struct FakeRedis {
    pub addr: SocketAddr,
    commands: Arc<Mutex<Vec<Vec<String>>>>,
    connections: Arc<Mutex<usize>>,
}

impl FakeRedis {
    /// Start a responder on an ephemeral local port.
    pub async fn start() -> Self {
        Self::spawn(true).await
    }

    /// Start a responder that accepts connections but never replies.
    pub async fn silent() -> Self {
        Self::spawn(false).await
    }

    async fn spawn(reply: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let fake = Self {
            addr,
            commands: Arc::new(Mutex::new(Vec::new())),
            connections: Arc::new(Mutex::new(0)),
        };

        let handle = fake.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                *handle.connections.lock().unwrap() += 1;
                let conn = handle.clone();
                tokio::spawn(async move { conn.serve(stream, reply).await });
            }
        });

        fake
    }

    async fn serve(&self, mut stream: TcpStream, reply: bool) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            while let Some((args, used)) = parse_command(&buf) {
                buf.drain(..used);
                let is_ping = args
                    .first()
                    .is_some_and(|name| name.eq_ignore_ascii_case("PING"));
                self.commands.lock().unwrap().push(args);

                if reply {
                    let response: &[u8] = if is_ping { b"+PONG\r\n" } else { b"+OK\r\n" };
                    if stream.write_all(response).await.is_err() {
                        return;
                    }
                }
            }
        }
    }

    /// Command names received so far, upper-cased.
    pub fn command_names(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter_map(|args| args.first().map(|name| name.to_uppercase()))
            .collect()
    }

    /// Full argument lists received so far.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of TCP connections accepted.
    pub fn connections(&self) -> usize {
        *self.connections.lock().unwrap()
    }
}

fn read_line(buf: &[u8], pos: usize) -> Option<(&str, usize)> {
    let rest = buf.get(pos..)?;
    let end = rest.windows(2).position(|w| w == b"\r\n")?;
    let line = std::str::from_utf8(&rest[..end]).ok()?;
    Some((line, pos + end + 2))
}

/// Parse one RESP array command; `None` until a full command is buffered.
fn parse_command(buf: &[u8]) -> Option<(Vec<String>, usize)> {
    let (header, mut pos) = read_line(buf, 0)?;
    let count: usize = header.strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let (len_line, start) = read_line(buf, pos)?;
        let len: usize = len_line.strip_prefix('$')?.parse().ok()?;
        let end = start + len;
        if buf.len() < end + 2 {
            return None;
        }
        args.push(String::from_utf8_lossy(&buf[start..end]).into_owned());
        pos = end + 2;
    }
    Some((args, pos))
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Configuration pointing both dependencies at local addresses.
pub fn config_with(redis_port: u16, extra: &[(&str, &str)]) -> Config {
    let redis_port = redis_port.to_string();
    let mut vars = vec![
        ("SERVER_PORT".to_string(), "0".to_string()),
        ("MYSQL_HOST".to_string(), "127.0.0.1".to_string()),
        ("MYSQL_PORT".to_string(), closed_port().to_string()),
        ("REDIS_HOST".to_string(), "127.0.0.1".to_string()),
        ("REDIS_PORT".to_string(), redis_port),
    ];
    for (key, value) in extra {
        vars.retain(|(k, _)| k.as_str() != *key);
        vars.push((key.to_string(), value.to_string()));
    }
    Config::from_vars(vars).unwrap()
}

/// Issue a plain HTTP/1.1 request and return (status line, body).
pub async fn http_request(addr: SocketAddr, method: &str, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request =
        format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8(raw).unwrap();

    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    let status = head.lines().next().unwrap_or_default().to_string();
    (status, body.to_string())
}
