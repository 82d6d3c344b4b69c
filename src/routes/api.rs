// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for catalog, progression and ranking.

use crate::error::{AppError, Result};
use crate::models::{Badge, BadgeKind, ContentUnit, LeaderboardEntry, LevelProgress, MapPinView};
use crate::models::{UnitView, UserRank};
use crate::services::Profile;
use crate::time_utils::{format_day, format_utc_rfc3339};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_LEADERBOARD_LIMIT: usize = 50;
const MAX_LEADERBOARD_LIMIT: usize = 100;
const DEFAULT_MAP_RADIUS_KM: f64 = 25.0;
const MAX_MAP_RADIUS_KM: f64 = 20_000.0;
const DEFAULT_AVATAR: &str = "🌲";

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/catalog", get(get_catalog))
        .route("/api/users", post(start_session))
        .route("/api/users/{user_id}", get(get_profile))
        .route("/api/users/{user_id}/catalog", get(get_user_catalog))
        .route(
            "/api/users/{user_id}/units/{unit_id}/complete",
            post(complete_unit),
        )
        .route("/api/users/{user_id}/rank", get(get_rank))
        .route("/api/users/{user_id}/map", get(get_map))
        .route("/api/leaderboard", get(get_leaderboard))
}

// ─── Catalog ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CatalogResponse {
    /// Changes whenever the catalog source changes
    pub revision: String,
    pub units: Vec<ContentUnit>,
}

/// Get the catalog without any per-user state.
async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let catalog = state.progression.catalog();
    Json(CatalogResponse {
        revision: catalog.revision().to_string(),
        units: catalog.units().to_vec(),
    })
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserCatalogResponse {
    pub revision: String,
    pub units: Vec<UnitView>,
}

/// Get the catalog with lock flags for a user.
async fn get_user_catalog(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserCatalogResponse>> {
    let units = state.progression.get_unlocked_catalog(&user_id)?;
    Ok(Json(UserCatalogResponse {
        revision: state.progression.catalog().revision().to_string(),
        units,
    }))
}

// ─── Session & Profile ───────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 16))]
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Badge with display metadata.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BadgeView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_at: String,
}

impl From<&Badge> for BadgeView {
    fn from(badge: &Badge) -> Self {
        // Badges from older rule sets keep their raw id as the name
        let (name, description, icon) = match BadgeKind::from_id(&badge.id) {
            Some(kind) => (kind.name(), kind.description(), kind.icon().to_string()),
            None => (badge.id.clone(), String::new(), "🏅".to_string()),
        };
        Self {
            id: badge.id.clone(),
            name,
            description,
            icon,
            earned_at: format_utc_rfc3339(badge.awarded_at),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub user_id: String,
    pub display_name: String,
    pub avatar: String,
    pub xp: u32,
    pub streak: u32,
    pub badges: Vec<BadgeView>,
    pub level: LevelProgress,
    pub completed_units: u32,
    pub total_units: u32,
    pub progress_percent: u32,
    /// None when the user is unranked
    pub rank: Option<u32>,
    pub identifications: u32,
    pub registered_at: String,
    pub last_active_day: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let state = profile.state;
        Self {
            user_id: state.user_id().to_string(),
            display_name: state.display_name().to_string(),
            avatar: state.avatar().to_string(),
            xp: state.xp(),
            streak: state.streak(),
            badges: state.badges().iter().map(BadgeView::from).collect(),
            level: profile.level,
            completed_units: profile.completed_units,
            total_units: profile.total_units,
            progress_percent: profile.progress_percent,
            rank: profile.rank.position(),
            identifications: state.identification_count(),
            registered_at: format_utc_rfc3339(state.registered_at()),
            last_active_day: state.last_active_day().map(format_day),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    /// True on the user's first session
    pub created: bool,
    pub profile: ProfileResponse,
}

/// User ids are opaque but restricted to URL-safe characters.
fn check_user_id(user_id: &str) -> Result<()> {
    let valid = user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "user_id may only contain letters, digits, '-', '_' and '.'".to_string(),
        ))
    }
}

/// Start a session, registering the user on first visit.
async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    check_user_id(&payload.user_id)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be blank".to_string()));
    }

    let avatar = payload.avatar.as_deref().unwrap_or(DEFAULT_AVATAR);
    let (_, created) = state
        .progression
        .start_session(&payload.user_id, name, avatar);
    let profile = state.progression.get_profile(&payload.user_id)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SessionResponse {
            created,
            profile: profile.into(),
        }),
    ))
}

/// Get a user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.progression.get_profile(&user_id)?;
    Ok(Json(profile.into()))
}

// ─── Completion ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompleteUnitResponse {
    pub unit_id: String,
    /// False when the unit was already completed (no XP granted)
    pub newly_completed: bool,
    pub xp_awarded: u32,
    pub xp: u32,
    pub badges_awarded: Vec<BadgeView>,
}

/// Mark a unit as completed.
async fn complete_unit(
    State(state): State<Arc<AppState>>,
    Path((user_id, unit_id)): Path<(String, String)>,
) -> Result<Json<CompleteUnitResponse>> {
    let outcome = state.progression.complete_unit(&user_id, &unit_id)?;

    Ok(Json(CompleteUnitResponse {
        unit_id,
        newly_completed: outcome.newly_completed,
        xp_awarded: outcome.xp_awarded,
        xp: outcome.xp,
        badges_awarded: outcome.badges_awarded.iter().map(BadgeView::from).collect(),
    }))
}

// ─── Ranking ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LEADERBOARD_LIMIT
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub total_users: u32,
}

/// Get the leaderboard (recomputed on every request).
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    if params.limit == 0 {
        return Err(AppError::BadRequest(
            "limit must be greater than 0".to_string(),
        ));
    }
    let limit = params.limit.min(MAX_LEADERBOARD_LIMIT);

    let entries = state.progression.get_leaderboard(Some(limit));
    let total_users = state.progression.db().user_count() as u32;

    Ok(Json(LeaderboardResponse {
        entries,
        total_users,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankResponse {
    pub user_id: String,
    pub ranked: bool,
    pub position: Option<u32>,
}

/// Get a user's leaderboard position. Unknown users are "unranked".
async fn get_rank(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<RankResponse> {
    let rank = state.progression.get_user_rank(&user_id);
    Json(RankResponse {
        ranked: rank != UserRank::Unranked,
        position: rank.position(),
        user_id,
    })
}

// ─── Map ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MapQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius_km: Option<f64>,
}

/// Parse the optional proximity filter.
fn parse_near(params: &MapQuery) -> Result<Option<(Point<f64>, f64)>> {
    let (lat, lng) = match (params.lat, params.lng) {
        (None, None) => {
            if params.radius_km.is_some() {
                return Err(AppError::BadRequest(
                    "radius_km requires lat and lng".to_string(),
                ));
            }
            return Ok(None);
        }
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(AppError::BadRequest(
                "lat and lng must be given together".to_string(),
            ))
        }
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest("Coordinates out of range".to_string()));
    }

    let radius = params.radius_km.unwrap_or(DEFAULT_MAP_RADIUS_KM);
    if !(radius > 0.0 && radius <= MAX_MAP_RADIUS_KM) {
        return Err(AppError::BadRequest(format!(
            "radius_km must be in (0, {}]",
            MAX_MAP_RADIUS_KM
        )));
    }

    Ok(Some((Point::new(lng, lat), radius)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapResponse {
    pub pins: Vec<MapPinView>,
}

/// Get map pins with completion flags.
async fn get_map(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<MapQuery>,
) -> Result<Json<MapResponse>> {
    let near = parse_near(&params)?;
    let pins = state.progression.get_map_pins(&user_id, near)?;
    Ok(Json(MapResponse { pins }))
}
