//! Typed operations over the movie service.
//!
//! # Design
//! `MoviesClient` holds the base URL and a `RequestExecutor`; it carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method producing an `HttpRequest` and a call through the executor that
//! sends it and decodes the payload. The `build_*` methods stay public so
//! request shapes can be checked without a network.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};
use crate::types::Movie;
use crate::uri::UrlBuilder;

pub const ALL_MOVIES_V1: &str = "/movieservice/v1/allMovies";
pub const MOVIE_BY_ID_V1: &str = "/movieservice/v1/movie/{}";
pub const MOVIE_BY_NAME_V1: &str = "/movieservice/v1/movieName";
pub const MOVIE_BY_YEAR_V1: &str = "/movieservice/v1/movieYear";
pub const ADD_MOVIE_V1: &str = "/movieservice/v1/movie";

/// Returned by [`MoviesClient::delete_movie_by_name`] on success. This is a
/// client-side constant; the server's response body is not consulted.
pub const MOVIE_DELETED: &str = "Movie Deleted Successfully";

/// Blocking client for the movie service.
///
/// Safe to share between threads when the transport is; the default
/// `UreqTransport` is.
#[derive(Debug, Clone)]
pub struct MoviesClient<T = UreqTransport> {
    base_url: String,
    executor: RequestExecutor<T>,
}

impl MoviesClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config.base_url(), UreqTransport::new(config))
    }
}

impl<T: Transport> MoviesClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor: RequestExecutor::new(transport),
        }
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    pub fn all_movies(&self) -> Result<Vec<Movie>, ApiError> {
        let movies: Option<Vec<Movie>> = self.executor.execute_json(&self.build_all_movies())?;
        Ok(movies.unwrap_or_default())
    }

    pub fn movie_by_id(&self, movie_id: u64) -> Result<Movie, ApiError> {
        self.executor.execute_json(&self.build_movie_by_id(movie_id))
    }

    pub fn movies_by_name(&self, name: &str) -> Result<Vec<Movie>, ApiError> {
        let movies: Option<Vec<Movie>> =
            self.executor.execute_json(&self.build_movies_by_name(name))?;
        Ok(movies.unwrap_or_default())
    }

    pub fn movies_by_year(&self, year: i32) -> Result<Vec<Movie>, ApiError> {
        let movies: Option<Vec<Movie>> =
            self.executor.execute_json(&self.build_movies_by_year(year))?;
        Ok(movies.unwrap_or_default())
    }

    /// Create a movie; the returned record carries the server-assigned id.
    pub fn add_movie(&self, movie: &Movie) -> Result<Movie, ApiError> {
        self.executor.execute_json(&self.build_add_movie(movie)?)
    }

    /// Send the present fields of `movie`; the server merges them into the
    /// stored record and returns the result.
    pub fn update_movie(&self, movie_id: u64, movie: &Movie) -> Result<Movie, ApiError> {
        self.executor
            .execute_json(&self.build_update_movie(movie_id, movie)?)
    }

    /// Returns the server's confirmation text verbatim.
    pub fn delete_movie(&self, movie_id: u64) -> Result<String, ApiError> {
        self.executor.execute_text(&self.build_delete_movie(movie_id))
    }

    /// Returns [`MOVIE_DELETED`] for any 2xx response, whatever the body says.
    pub fn delete_movie_by_name(&self, name: &str) -> Result<String, ApiError> {
        self.executor
            .execute_discard(&self.build_delete_movie_by_name(name))?;
        Ok(MOVIE_DELETED.to_string())
    }

    pub fn build_all_movies(&self) -> HttpRequest {
        self.request(HttpMethod::Get, UrlBuilder::new(ALL_MOVIES_V1))
    }

    pub fn build_movie_by_id(&self, movie_id: u64) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            UrlBuilder::new(MOVIE_BY_ID_V1).path_param(movie_id),
        )
    }

    pub fn build_movies_by_name(&self, name: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            UrlBuilder::new(MOVIE_BY_NAME_V1).query_param("movie_name", name),
        )
    }

    pub fn build_movies_by_year(&self, year: i32) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            UrlBuilder::new(MOVIE_BY_YEAR_V1).query_param("year", year),
        )
    }

    pub fn build_add_movie(&self, movie: &Movie) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, UrlBuilder::new(ADD_MOVIE_V1), movie)
    }

    pub fn build_update_movie(&self, movie_id: u64, movie: &Movie) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            UrlBuilder::new(MOVIE_BY_ID_V1).path_param(movie_id),
            movie,
        )
    }

    pub fn build_delete_movie(&self, movie_id: u64) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            UrlBuilder::new(MOVIE_BY_ID_V1).path_param(movie_id),
        )
    }

    pub fn build_delete_movie_by_name(&self, name: &str) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            UrlBuilder::new(MOVIE_BY_NAME_V1).query_param("movie_name", name),
        )
    }

    fn request(&self, method: HttpMethod, url: UrlBuilder) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{}", self.base_url, url.build()),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request(
        &self,
        method: HttpMethod,
        url: UrlBuilder,
        movie: &Movie,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(movie).map_err(ApiError::unexpected)?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.request(method, url)
        })
    }
}
