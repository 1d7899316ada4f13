//! Domain DTOs for the movie service.
//!
//! # Design
//! These types mirror the stub server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Every field is optional. The server is authoritative: it assigns
//! `movie_id`, rejects a create without `name`, and merges only the fields
//! present on an update. Absent fields are left out of the JSON entirely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie record as exchanged with the movie service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

impl Movie {
    /// A new record ready to be created; `movie_id` is left for the server.
    pub fn new(name: &str, cast: &str, year: i32, release_date: NaiveDate) -> Self {
        Self {
            movie_id: None,
            name: Some(name.to_string()),
            cast: Some(cast.to_string()),
            year: Some(year),
            release_date: Some(release_date),
        }
    }
}
