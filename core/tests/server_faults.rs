//! Failure paths against stub servers that misbehave on purpose: error
//! statuses, responses slower than the read timeout, connections closed
//! before or in the middle of a response, bodies that are oversized or not
//! UTF-8, and nothing listening at all.

use std::net::SocketAddr;
use std::time::Duration;

use mock_server::fault::{fault_app, raw_response, spawn_empty_response, spawn_raw_response, Fault};
use movies_core::{ClientConfig, ErrorCause, MoviesClient, TransportFault};

fn client_at(addr: SocketAddr, read_timeout: Duration) -> MoviesClient {
    let config = ClientConfig::new(&format!("http://{addr}"))
        .unwrap()
        .with_connect_timeout(Duration::from_secs(1))
        .with_read_timeout(read_timeout)
        .with_write_timeout(Duration::from_secs(1));
    MoviesClient::new(&config)
}

fn raw(response: Vec<u8>) -> MoviesClient {
    let addr = spawn_raw_response(response).unwrap();
    client_at(addr, Duration::from_secs(5))
}

fn faulty(fault: Fault) -> MoviesClient {
    let addr = mock_server::spawn(fault_app(fault)).unwrap();
    client_at(addr, Duration::from_secs(5))
}

#[test]
fn internal_server_error() {
    let err = faulty(Fault::Status(500, String::new()))
        .all_movies()
        .unwrap_err();
    assert_eq!(err.status_text(), "Internal Server Error");
    assert_eq!(err.status(), Some(500));
}

#[test]
fn service_unavailable_keeps_body() {
    let err = faulty(Fault::Status(503, "Service Unavailable".to_string()))
        .all_movies()
        .unwrap_err();
    assert_eq!(err.message(), "Service Unavailable");
}

#[test]
fn every_operation_normalizes_error_status() {
    let client = faulty(Fault::Status(502, "upstream down".to_string()));
    let movie = movies_core::Movie::default();

    let errors = [
        client.all_movies().unwrap_err(),
        client.movie_by_id(1).unwrap_err(),
        client.movies_by_name("Toy Story").unwrap_err(),
        client.movies_by_year(2019).unwrap_err(),
        client.add_movie(&movie).unwrap_err(),
        client.update_movie(1, &movie).unwrap_err(),
        client.delete_movie(1).unwrap_err(),
        client.delete_movie_by_name("Toy Story").unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.status_text(), "Bad Gateway");
        assert_eq!(err.message(), "upstream down");
    }
}

#[test]
fn empty_response_is_premature_close() {
    let addr = spawn_empty_response().unwrap();
    let err = client_at(addr, Duration::from_secs(5))
        .all_movies()
        .unwrap_err();
    assert_eq!(err.status_text(), "transport error");
    assert!(
        err.message()
            .contains("Connection prematurely closed BEFORE response"),
        "unexpected message: {}",
        err.message()
    );
    assert!(matches!(
        err.cause(),
        ErrorCause::Transport(TransportFault::PrematureClose(_))
    ));
}

#[test]
fn slow_response_times_out() {
    let addr = mock_server::spawn(fault_app(Fault::Delay(Duration::from_secs(3)))).unwrap();
    let err = client_at(addr, Duration::from_millis(200))
        .all_movies()
        .unwrap_err();
    assert_eq!(err.status_text(), "transport error");
    assert!(!err.message().is_empty());
    assert!(matches!(
        err.cause(),
        ErrorCause::Transport(TransportFault::Timeout(_))
    ));
}

#[test]
fn delays_past_the_read_timeout_all_time_out() {
    for delay in [500, 1_000, 2_000] {
        let addr =
            mock_server::spawn(fault_app(Fault::Delay(Duration::from_millis(delay)))).unwrap();
        let err = client_at(addr, Duration::from_millis(200))
            .movie_by_id(1)
            .unwrap_err();
        assert!(
            matches!(
                err.cause(),
                ErrorCause::Transport(TransportFault::Timeout(_))
            ),
            "delay {delay}ms gave {err}"
        );
    }
}

#[test]
fn error_status_with_invalid_utf8_body_keeps_status() {
    let client = raw(raw_response("404 Not Found", b"\xff\xfeNo Movie"));
    let err = client.movie_by_id(42).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.status_text(), "Not Found");
    assert!(err.message().ends_with("No Movie"), "message: {}", err.message());
}

#[test]
fn success_with_invalid_utf8_body_is_unexpected() {
    let client = raw(raw_response("200 OK", b"[\xff]"));
    let err = client.all_movies().unwrap_err();
    assert_eq!(err.status_text(), "unexpected error");
    assert!(matches!(err.cause(), ErrorCause::Unexpected(_)));
}

#[test]
fn body_over_configured_limit_is_unexpected() {
    let body = format!("[{}]", " ".repeat(2048));
    let addr = spawn_raw_response(raw_response("200 OK", body.as_bytes())).unwrap();
    let config = ClientConfig::new(&format!("http://{addr}"))
        .unwrap()
        .with_max_body_bytes(1024);
    let err = MoviesClient::new(&config).all_movies().unwrap_err();
    assert_eq!(err.status_text(), "unexpected error");
    assert!(err.status().is_none());
    assert!(matches!(err.cause(), ErrorCause::Unexpected(_)));
}

#[test]
fn large_body_is_read_in_full_by_default() {
    let body = format!("[{}]", " ".repeat(11 * 1024 * 1024));
    let movies = raw(raw_response("200 OK", body.as_bytes()))
        .all_movies()
        .unwrap();
    assert!(movies.is_empty());
}

#[test]
fn connection_closed_mid_body_is_truncation() {
    let mut response = b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\nconnection: close\r\n\r\n".to_vec();
    response.extend_from_slice(b"[{\"movieId\":1,");
    let err = raw(response).all_movies().unwrap_err();
    assert_eq!(err.status_text(), "transport error");
    assert!(matches!(
        err.cause(),
        ErrorCause::Transport(TransportFault::TruncatedBody(_))
    ));
    assert!(
        !err.message().contains("BEFORE response"),
        "message: {}",
        err.message()
    );
}

#[test]
fn nothing_listening_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let err = client_at(addr, Duration::from_secs(1))
        .movie_by_id(1)
        .unwrap_err();
    assert_eq!(err.status_text(), "transport error");
    assert!(!err.message().is_empty());
    assert!(err.status().is_none());
}

