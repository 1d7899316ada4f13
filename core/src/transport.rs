//! The network seam: turning an `HttpRequest` into a fully received `HttpResponse`.
//!
//! # Design
//! `Transport` is the only place that performs I/O. The production
//! implementation is a blocking `ureq` agent configured from `ClientConfig`;
//! tests substitute an in-memory fake. A transport never interprets status
//! codes: 4xx/5xx responses come back as data, with their bodies decoded
//! lossily so the status is never lost. It reports failures where no complete
//! response was obtained, already classified as a `TransportFault`, and 2xx
//! bodies that are over the configured limit or not UTF-8.

use std::io;

use thiserror::Error;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::{BoxError, TransportFault};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Why `Transport::send` produced no response.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Fault(#[from] TransportFault),

    /// The request could not be built (bad URI, malformed header, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] BoxError),

    /// A response arrived but its body is unusable: over the size limit, or
    /// not UTF-8 on a 2xx status.
    #[error("unreadable response body: {0}")]
    UnreadableBody(#[source] BoxError),
}

/// Executes one HTTP exchange, blocking until a terminal outcome.
///
/// Implementations must be safe to share between threads and must drain or
/// drop the connection on every exit path.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SendError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SendError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent` connection pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_body_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.connect_timeout))
            .timeout_send_request(Some(config.write_timeout))
            .timeout_send_body(Some(config.write_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .build()
            .new_agent();
        Self {
            agent,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SendError> {
        let url = request.path.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), request).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), request).send_empty(),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(classify_body)?;
        let body = decode_body(status, bytes)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify(error: ureq::Error) -> SendError {
    match error {
        ureq::Error::Timeout(which) => TransportFault::Timeout(which.to_string()).into(),
        ureq::Error::Io(io_error) => classify_io(io_error).into(),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportFault::Connect(error.to_string()).into()
        }
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => SendError::InvalidRequest(Box::new(error)),
        other => TransportFault::Io(other.to_string()).into(),
    }
}

/// Failures while reading the body. The status line has already arrived, so
/// only genuine I/O trouble is a transport fault.
fn classify_body(error: ureq::Error) -> SendError {
    match error {
        ureq::Error::BodyExceedsLimit(_) => SendError::UnreadableBody(Box::new(error)),
        ureq::Error::Io(io_error) => match io_error.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => {
                TransportFault::TruncatedBody(io_error.to_string()).into()
            }
            _ => classify_io(io_error).into(),
        },
        other => classify(other),
    }
}

/// Error bodies are kept even when they are not UTF-8; a 2xx body that is
/// not UTF-8 cannot be decoded and is rejected.
fn decode_body(status: u16, bytes: Vec<u8>) -> Result<String, SendError> {
    if (200..300).contains(&status) {
        String::from_utf8(bytes).map_err(|err| SendError::UnreadableBody(Box::new(err)))
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify_io(error: io::Error) -> TransportFault {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            TransportFault::Timeout(error.to_string())
        }
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TransportFault::PrematureClose(error.to_string()),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrNotAvailable => {
            TransportFault::Connect(error.to_string())
        }
        _ => TransportFault::Io(error.to_string()),
    }
}
