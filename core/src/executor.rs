//! Request execution and error normalization.
//!
//! # Design
//! `RequestExecutor` is the boundary where every failure becomes an
//! `ApiError`. It sends one request through its `Transport`, checks the
//! status and decodes the body into the shape the caller asks for. Nothing
//! is retried and no state is kept between calls.

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{SendError, Transport};

#[derive(Debug, Clone)]
pub struct RequestExecutor<T> {
    transport: T,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and return the response if its status is 2xx.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");

        let response = self.transport.send(request).map_err(|err| {
            let err = match err {
                SendError::Fault(fault) => ApiError::from_fault(fault),
                SendError::InvalidRequest(inner) | SendError::UnreadableBody(inner) => {
                    ApiError::unexpected(inner)
                }
            };
            error!(
                method = request.method.as_str(),
                url = %request.path,
                error = %err,
                "request failed before a usable response"
            );
            err
        })?;

        debug!(status = response.status, url = %request.path, "received response");
        check_status(response)
    }

    /// Execute and decode a JSON body.
    pub fn execute_json<P: DeserializeOwned>(&self, request: &HttpRequest) -> Result<P, ApiError> {
        let response = self.execute(request)?;
        decode_json(&response)
    }

    /// Execute and return the body as text.
    pub fn execute_text(&self, request: &HttpRequest) -> Result<String, ApiError> {
        Ok(self.execute(request)?.body)
    }

    /// Execute for the outcome only; a successful body is discarded.
    pub fn execute_discard(&self, request: &HttpRequest) -> Result<(), ApiError> {
        self.execute(request).map(drop)
    }
}

/// Turn a non-2xx response into an `ApiError` carrying the raw body.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    error!(
        status = response.status,
        body = %response.body,
        "movie service returned an error status"
    );
    Err(ApiError::from_status(&response))
}

/// Decode a JSON body. An empty body decodes as JSON `null`, so optional and
/// list payloads still work against servers that answer 2xx with no content.
fn decode_json<P: DeserializeOwned>(response: &HttpResponse) -> Result<P, ApiError> {
    let body = response.body.trim();
    let result = if body.is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(body)
    };
    result.map_err(|err| {
        error!(error = %err, "failed to decode response body");
        ApiError::unexpected(err)
    })
}
