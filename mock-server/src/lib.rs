use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub mod fault;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
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

#[derive(Deserialize)]
pub struct NameQuery {
    pub movie_name: String,
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

#[derive(Default)]
pub struct Catalog {
    movies: BTreeMap<u64, Movie>,
    next_id: u64,
}

impl Catalog {
    fn insert(&mut self, mut movie: Movie) -> Movie {
        self.next_id += 1;
        movie.movie_id = Some(self.next_id);
        self.movies.insert(self.next_id, movie.clone());
        movie
    }

    fn matching_name(&self, name: &str) -> Vec<u64> {
        let needle = name.to_lowercase();
        self.movies
            .iter()
            .filter(|(_, m)| {
                m.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

pub type Db = Arc<RwLock<Catalog>>;

type Failure = (StatusCode, String);

pub const DELETED: &str = "Movie Deleted Successfully";

pub fn app() -> Router {
    router(Catalog::default())
}

/// A router preloaded with `seed_movies()`; "Batman Begins" gets id 1.
pub fn seeded_app() -> Router {
    let mut catalog = Catalog::default();
    for movie in seed_movies() {
        catalog.insert(movie);
    }
    router(catalog)
}

pub fn seed_movies() -> Vec<Movie> {
    let movie = |name: &str, cast: &str, year: i32, (y, m, d): (i32, u32, u32)| Movie {
        movie_id: None,
        name: Some(name.to_string()),
        cast: Some(cast.to_string()),
        year: Some(year),
        release_date: NaiveDate::from_ymd_opt(y, m, d),
    };
    vec![
        movie("Batman Begins", "Christian Bale, Katie Holmes", 2005, (2005, 6, 15)),
        movie("Dark Knight", "Christian Bale, Heath Ledger", 2008, (2008, 7, 18)),
        movie("The Dark Knight Rises", "Christian Bale, Tom Hardy", 2012, (2012, 7, 20)),
        movie("The Avengers", "Robert Downey Jr, Chris Evans", 2012, (2012, 5, 4)),
        movie("Avengers: Age of Ultron", "Robert Downey Jr, Chris Evans", 2015, (2015, 5, 1)),
        movie("Avengers: Infinity War", "Robert Downey Jr, Chris Hemsworth", 2018, (2018, 4, 27)),
        movie("Avengers: Endgame", "Robert Downey Jr, Chris Hemsworth", 2019, (2019, 4, 26)),
    ]
}

fn router(catalog: Catalog) -> Router {
    let db: Db = Arc::new(RwLock::new(catalog));
    Router::new()
        .route("/movieservice/v1/allMovies", get(all_movies))
        .route("/movieservice/v1/movie", post(add_movie))
        .route(
            "/movieservice/v1/movie/{id}",
            get(movie_by_id).put(update_movie).delete(delete_movie),
        )
        .route(
            "/movieservice/v1/movieName",
            get(movies_by_name).delete(delete_movies_by_name),
        )
        .route("/movieservice/v1/movieYear", get(movies_by_year))
        .with_state(db)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// Serve `router` on an ephemeral port from a background thread so blocking
/// tests can talk to it.
pub fn spawn(router: Router) -> std::io::Result<SocketAddr> {
    spawn_with(move |listener| run(listener, router))
}

pub(crate) fn spawn_with<F, Fut>(serve: F) -> std::io::Result<SocketAddr>
where
    F: FnOnce(TcpListener) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), std::io::Error>>,
{
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        let result = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .and_then(|rt| {
                rt.block_on(async {
                    let listener = TcpListener::from_std(std_listener)?;
                    serve(listener).await
                })
            });
        if let Err(err) = result {
            tracing::error!(%addr, error = %err, "stub server stopped");
        }
    });
    Ok(addr)
}

fn not_found(what: &str, value: impl std::fmt::Display) -> Failure {
    (
        StatusCode::NOT_FOUND,
        format!("No Movie Available with the given {what} - {value}"),
    )
}

async fn all_movies(State(db): State<Db>) -> Json<Vec<Movie>> {
    let catalog = db.read().await;
    Json(catalog.movies.values().cloned().collect())
}

async fn movie_by_id(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Movie>, Failure> {
    let catalog = db.read().await;
    catalog
        .movies
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Id", id))
}

async fn movies_by_name(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Movie>>, Failure> {
    let catalog = db.read().await;
    let found: Vec<Movie> = catalog
        .matching_name(&query.movie_name)
        .iter()
        .filter_map(|id| catalog.movies.get(id).cloned())
        .collect();
    if found.is_empty() {
        return Err(not_found("name", &query.movie_name));
    }
    Ok(Json(found))
}

async fn movies_by_year(
    State(db): State<Db>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<Movie>>, Failure> {
    let catalog = db.read().await;
    let found: Vec<Movie> = catalog
        .movies
        .values()
        .filter(|m| m.year == Some(query.year))
        .cloned()
        .collect();
    if found.is_empty() {
        return Err(not_found("year", query.year));
    }
    Ok(Json(found))
}

async fn add_movie(State(db): State<Db>, Json(input): Json<Movie>) -> Result<Json<Movie>, Failure> {
    if input.name.as_deref().map_or(true, str::is_empty) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please pass all the input fields : [name]".to_string(),
        ));
    }
    let movie = db.write().await.insert(Movie {
        movie_id: None,
        ..input
    });
    tracing::info!(movie_id = ?movie.movie_id, "movie added");
    Ok(Json(movie))
}

async fn update_movie(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<Movie>,
) -> Result<Json<Movie>, Failure> {
    let mut catalog = db.write().await;
    let movie = catalog.movies.get_mut(&id).ok_or_else(|| not_found("Id", id))?;
    if let Some(name) = input.name {
        movie.name = Some(name);
    }
    if let Some(cast) = input.cast {
        movie.cast = Some(match movie.cast.take() {
            Some(existing) => format!("{existing}, {cast}"),
            None => cast,
        });
    }
    if let Some(year) = input.year {
        movie.year = Some(year);
    }
    if let Some(release_date) = input.release_date {
        movie.release_date = Some(release_date);
    }
    Ok(Json(movie.clone()))
}

async fn delete_movie(State(db): State<Db>, Path(id): Path<u64>) -> Result<String, Failure> {
    let mut catalog = db.write().await;
    catalog
        .movies
        .remove(&id)
        .map(|_| DELETED.to_string())
        .ok_or_else(|| not_found("Id", id))
}

async fn delete_movies_by_name(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
) -> Result<StatusCode, Failure> {
    let mut catalog = db.write().await;
    let ids = catalog.matching_name(&query.movie_name);
    if ids.is_empty() {
        return Err(not_found("name", &query.movie_name));
    }
    for id in ids {
        catalog.movies.remove(&id);
    }
    Ok(StatusCode::OK)
}
