//! Blocking client for the movie catalog service.
//!
//! # Overview
//! `MoviesClient` exposes the catalog operations (list, lookups by id, name
//! and year, create, update, delete). Every operation either returns a
//! decoded payload or exactly one `ApiError`; raw transport errors and raw
//! HTTP statuses never reach the caller.
//!
//! # Design
//! - `uri::UrlBuilder` composes path templates and query parameters.
//! - `executor::RequestExecutor` sends a request through a `Transport`,
//!   interprets the status and normalizes every failure into `ApiError`.
//! - `transport::UreqTransport` is the production transport; tests plug in
//!   fakes through the `Transport` trait.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;
pub mod types;
pub mod uri;

pub use client::{MoviesClient, MOVIE_DELETED};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorCause, TransportFault};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{SendError, Transport, UreqTransport};
pub use types::Movie;
pub use uri::UrlBuilder;
