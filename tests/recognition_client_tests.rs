// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PlantNet client tests against a local fake server.

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use treequest::services::{RecognitionError, RecognitionService};

const API_KEY: &str = "secret-key";

/// Fake PlantNet: the project name selects the behavior.
async fn fake_identify(
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if params.get("api-key").map(String::as_str) != Some(API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let form = String::from_utf8_lossy(&body);
    if !form.contains("name=\"organs\"") || !form.contains("leaf") || !form.contains("name=\"images\"") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match project.as_str() {
        "all" => Json(json!({
            "query": {"project": "all"},
            "bestMatch": "Quercus robur L.",
            "results": [
                {"score": 0.8731, "species": {"scientificName": "Quercus robur L.", "commonNames": ["English oak"]}},
                {"score": 0.0412, "species": {"scientificName": "Quercus petraea (Matt.) Liebl.", "commonNames": []}}
            ]
        }))
        .into_response(),
        "empty" => Json(json!({"results": []})).into_response(),
        "missing" => (StatusCode::NOT_FOUND, Json(json!({"message": "Species not found"}))).into_response(),
        "busy" => StatusCode::TOO_MANY_REQUESTS.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"results": []})).into_response()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Start the fake server and return its base URL.
async fn start_fake_plantnet() -> String {
    let app = Router::new().route("/v2/identify/{project}", post(fake_identify));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn client(project: &str) -> RecognitionService {
    let base_url = start_fake_plantnet().await;
    RecognitionService::new(
        base_url,
        project.to_string(),
        API_KEY.to_string(),
        Duration::from_millis(500),
    )
    .unwrap()
}

#[tokio::test]
async fn test_results_are_ranked_best_first() {
    let service = client("all").await;

    let matches = service
        .identify(vec![0xFF, 0xD8, 0xFF], Some("image/jpeg"))
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].scientific_name, "Quercus robur L.");
    assert_eq!(matches[0].common_names, vec!["English oak"]);
    assert!((matches[0].score - 0.8731).abs() < 1e-9);
}

#[tokio::test]
async fn test_empty_results_and_not_found_mean_no_match() {
    for project in ["empty", "missing"] {
        let service = client(project).await;
        let matches = service.identify(vec![1, 2, 3], None).await.unwrap();
        assert!(matches.is_empty(), "{}", project);
    }
}

#[tokio::test]
async fn test_server_errors_are_unavailable() {
    for project in ["busy", "broken"] {
        let service = client(project).await;
        let err = service.identify(vec![1, 2, 3], None).await.unwrap_err();
        assert!(
            matches!(err, RecognitionError::Unavailable(_)),
            "{}: {:?}",
            project,
            err
        );
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let service = client("slow").await;

    let err = service.identify(vec![1, 2, 3], None).await.unwrap_err();

    assert!(matches!(err, RecognitionError::Timeout));
}

#[tokio::test]
async fn test_unreachable_service_does_not_leak_api_key() {
    // Port 9 (discard) is not listening on loopback
    let service = RecognitionService::new(
        "http://127.0.0.1:9".to_string(),
        "all".to_string(),
        API_KEY.to_string(),
        Duration::from_millis(500),
    )
    .unwrap();

    let err = service.identify(vec![1], None).await.unwrap_err();

    assert!(!err.to_string().contains(API_KEY));
}
