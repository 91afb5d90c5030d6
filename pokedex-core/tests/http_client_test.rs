//! Integration tests for the HTTP catalog client against a local server
//!
//! The server speaks just enough HTTP/1.1 for one request per connection.
//! It serves a two-entry listing where only the second entry's detail
//! resolves; everything else answers 404.

mod common;

use common::{entity_json, init_test_logging};
use pokedex_core::catalog::{CatalogClient, HttpCatalogClient};
use pokedex_core::config::AppConfig;
use pokedex_core::error::{CatalogError, FetchFailure};
use pokedex_core::search::{Resolution, SearchLimits, SearchResolver};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_catalog_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_connection(stream, addr));
        }
    });

    addr
}

async fn serve_connection(mut stream: TcpStream, addr: SocketAddr) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = route(path, addr);

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn route(path: &str, addr: SocketAddr) -> (&'static str, String) {
    let detail_url = |id: u32| format!("http://{addr}/pokemon/{id}/");

    match path {
        "/pokemon?limit=200" => (
            "200 OK",
            json!({
                "count": 2,
                "results": [
                    {"name": "bulbasaur", "url": detail_url(1)},
                    {"name": "charmander", "url": detail_url(4)}
                ]
            })
            .to_string(),
        ),
        "/pokemon/4/" | "/pokemon/charmander" => {
            ("200 OK", entity_json(4, "charmander").to_string())
        }
        _ => ("404 Not Found", r#"{"detail": "Not found."}"#.to_string()),
    }
}

fn client_for(addr: SocketAddr) -> HttpCatalogClient {
    let mut config = AppConfig::default().with_api_base(format!("http://{addr}/pokemon"));
    config.request_timeout_seconds = Some(5);
    HttpCatalogClient::new(&config).unwrap()
}

fn is_http_404(source: &FetchFailure) -> bool {
    matches!(source, FetchFailure::Status(status) if *status == StatusCode::NOT_FOUND)
}

#[tokio::test]
async fn test_identifier_lookup_success() {
    init_test_logging();
    let client = client_for(spawn_catalog_server().await);

    let entity = client.fetch_by_identifier("Charmander").await.unwrap();

    assert_eq!(entity.id, 4);
    assert_eq!(entity.name, "charmander");
}

#[tokio::test]
async fn test_identifier_404_is_not_found() {
    init_test_logging();
    let client = client_for(spawn_catalog_server().await);

    let err = client.fetch_by_identifier("CHAR").await.unwrap_err();

    match &err {
        CatalogError::NotFound { identifier, source } => {
            assert_eq!(identifier, "CHAR");
            assert!(is_http_404(source), "unexpected source: {source:?}");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Search failed.");
}

#[tokio::test]
async fn test_listing_404_is_listing_error() {
    init_test_logging();
    let client = client_for(spawn_catalog_server().await);

    let err = client.fetch_listing(12).await.unwrap_err();

    match err {
        CatalogError::Listing { limit, source } => {
            assert_eq!(limit, 12);
            assert!(is_http_404(&source), "unexpected source: {source:?}");
        }
        other => panic!("expected Listing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_exact_match_falls_back_over_http() {
    init_test_logging();
    let client = client_for(spawn_catalog_server().await);
    let resolver = SearchResolver::new(&client, SearchLimits::default());

    let resolution = resolver.resolve("CHAR").await;

    match resolution {
        Resolution::Fallback(entities) => {
            let found: Vec<(u32, String)> =
                entities.into_iter().map(|e| (e.id, e.name)).collect();
            assert_eq!(found, vec![(4, "charmander".to_string())]);
        }
        other => panic!("expected fallback match, got {other:?}"),
    }
}

#[tokio::test]
async fn test_detail_404_fails_search() {
    init_test_logging();
    let addr = spawn_catalog_server().await;
    let client = client_for(addr);
    let resolver = SearchResolver::new(&client, SearchLimits::default());

    let resolution = resolver.resolve("bulb").await;

    match resolution {
        Resolution::Failed(err) => {
            assert_eq!(err.user_message(), "Search failed.");
            match err {
                CatalogError::DetailFetch { url, source } => {
                    assert_eq!(url, format!("http://{addr}/pokemon/1/"));
                    assert!(is_http_404(&source), "unexpected source: {source:?}");
                }
                other => panic!("expected DetailFetch, got {other:?}"),
            }
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
