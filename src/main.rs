// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TreeQuest API Server
//!
//! Serves the story catalog, tracks explorer progression, and rewards
//! tree identifications made through PlantNet.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use treequest::{
    config::Config,
    db::MemoryDb,
    services::{CatalogService, MapService, ProgressionService, RecognitionService},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting TreeQuest API");

    // A bad catalog is fatal: unlock order would be undefined
    tracing::info!(path = %config.catalog_path, "Loading content catalog");
    let catalog = CatalogService::load_from_file(&config.catalog_path)
        .context("Failed to load content catalog")?;
    tracing::info!(
        units = catalog.units().len(),
        revision = %catalog.revision(),
        "Content catalog loaded"
    );

    tracing::info!(path = %config.map_pins_path, "Loading map pins");
    let map = MapService::load_from_file(&config.map_pins_path, &catalog)
        .context("Failed to load map pins")?;
    tracing::info!(count = map.pins().len(), "Map pins loaded");

    let db = match &config.snapshot_path {
        Some(path) => MemoryDb::load_snapshot_file(path)
            .with_context(|| format!("Failed to load snapshot {}", path))?,
        None => {
            tracing::warn!("SNAPSHOT_PATH not set; progression will not survive a restart");
            MemoryDb::new()
        }
    };

    let recognition = RecognitionService::new(
        config.plantnet_base_url.clone(),
        config.plantnet_project.clone(),
        config.plantnet_api_key.clone(),
        config.recognition_timeout,
    )
    .context("Failed to initialize recognition client")?;
    tracing::info!(
        base_url = %config.plantnet_base_url,
        project = %config.plantnet_project,
        timeout_secs = config.recognition_timeout.as_secs(),
        "Recognition client initialized"
    );

    let progression = ProgressionService::new(Arc::new(catalog), Arc::new(map), db, recognition);

    let state = Arc::new(AppState {
        config: config.clone(),
        progression,
    });

    let app = treequest::routes::create_router(state.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &config.snapshot_path {
        state
            .progression
            .db()
            .save_snapshot_file(path)
            .with_context(|| format!("Failed to save snapshot {}", path))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("treequest=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
