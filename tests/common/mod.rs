// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use std::sync::Arc;
use treequest::config::Config;
use treequest::db::MemoryDb;
use treequest::models::SpeciesMatch;
use treequest::routes::create_router;
use treequest::services::{
    CatalogService, MapService, MockReply, ProgressionService, RecognitionService,
};
use treequest::AppState;

/// Path to a file under the crate's data/ directory.
#[allow(dead_code)]
pub fn data_path(name: &str) -> String {
    format!("{}/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Catalog shipped with the server.
#[allow(dead_code)]
pub fn test_catalog() -> CatalogService {
    CatalogService::load_from_file(data_path("catalog.json")).expect("catalog should load")
}

/// A confident oak match.
#[allow(dead_code)]
pub fn oak(score: f64) -> SpeciesMatch {
    SpeciesMatch {
        scientific_name: "Quercus robur".to_string(),
        common_names: vec!["English oak".to_string(), "Pedunculate oak".to_string()],
        score,
    }
}

/// Create a test app whose recognition service answers with `reply`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(reply: MockReply, db: MemoryDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let catalog = test_catalog();
    let map = MapService::load_from_file(data_path("map_pins.geojson"), &catalog)
        .expect("map pins should load");

    let progression = ProgressionService::new(
        Arc::new(catalog),
        Arc::new(map),
        db,
        RecognitionService::new_mock(reply),
    );

    let state = Arc::new(AppState {
        config,
        progression,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(MockReply::Matches(vec![oak(0.92)]), MemoryDb::new())
}

/// GET request with no body.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// POST request with a JSON body.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST request with no body.
#[allow(dead_code)]
pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// POST request with a raw image body.
#[allow(dead_code)]
pub fn post_image(uri: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(Body::from(bytes))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user directly through the service.
#[allow(dead_code)]
pub fn register(state: &AppState, user_id: &str, name: &str) {
    state.progression.start_session(user_id, name, "🌲");
}
