//! Misbehaving servers for exercising client failure paths.

use std::{net::SocketAddr, time::Duration};

use axum::{http::StatusCode, Router};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// How every request to a faulty server is answered.
#[derive(Clone, Debug)]
pub enum Fault {
    /// Reply with this status code and body.
    Status(u16, String),
    /// Wait this long, then reply 200 with an empty JSON list.
    Delay(Duration),
}

/// A router that answers any method and path with `fault`.
pub fn fault_app(fault: Fault) -> Router {
    Router::new().fallback(move || {
        let fault = fault.clone();
        async move {
            match fault {
                Fault::Status(code, body) => (
                    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    body,
                ),
                Fault::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    (StatusCode::OK, "[]".to_string())
                }
            }
        }
    })
}

/// Accept connections, read the request, and close without writing a byte.
pub async fn run_empty_response(listener: TcpListener) -> Result<(), std::io::Error> {
    loop {
        let (mut socket, peer) = listener.accept().await?;
        let mut buf = [0u8; 4096];
        let read = socket.read(&mut buf).await.unwrap_or(0);
        tracing::debug!(%peer, read, "closing connection without a response");
        drop(socket);
    }
}

pub fn spawn_empty_response() -> std::io::Result<SocketAddr> {
    crate::spawn_with(run_empty_response)
}

/// Accept connections, read the request, write `response` verbatim and close.
/// The bytes are not checked, so they can carry a lying `Content-Length` or a
/// body in any encoding.
pub async fn run_raw_response(
    listener: TcpListener,
    response: Vec<u8>,
) -> Result<(), std::io::Error> {
    loop {
        let (mut socket, peer) = listener.accept().await?;
        let mut buf = [0u8; 4096];
        let read = socket.read(&mut buf).await.unwrap_or(0);
        if let Err(err) = socket.write_all(&response).await {
            tracing::debug!(%peer, error = %err, "client went away mid-response");
        }
        let _ = socket.shutdown().await;
        tracing::debug!(%peer, read, written = response.len(), "closed raw response");
    }
}

pub fn spawn_raw_response(response: Vec<u8>) -> std::io::Result<SocketAddr> {
    crate::spawn_with(move |listener| run_raw_response(listener, response))
}

/// A complete HTTP/1.1 response whose `Content-Length` matches `body`.
pub fn raw_response(status_line: &str, body: &[u8]) -> Vec<u8> {
    let mut bytes = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    bytes.extend_from_slice(body);
    bytes
}
