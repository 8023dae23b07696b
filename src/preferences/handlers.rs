use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{PreferencesResponse, SavePreferencesRequest};
use super::services::{load_required, save_preferences};
use super::Preferences;
use crate::auth::{AdminUser, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

pub fn preferences_routes() -> Router<AppState> {
    Router::new().route("/preferences", get(get_preferences).put(put_preferences))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users/:id/preferences", get(get_user_preferences))
}

fn respond(state: &AppState, preferences: Preferences) -> Json<PreferencesResponse> {
    let personalized = preferences.liked_food_ids.len() >= state.config.planner.liked_threshold;
    Json(PreferencesResponse {
        preferences,
        personalized,
    })
}

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = load_required(state.preferences.as_ref(), user.user_id).await?;
    Ok(respond(&state, preferences))
}

#[instrument(skip(state, body))]
pub async fn put_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<SavePreferencesRequest>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = save_preferences(state.preferences.as_ref(), state.catalog, user.user_id, body).await?;
    Ok(respond(&state, preferences))
}

#[instrument(skip(state))]
pub async fn get_user_preferences(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = state
        .preferences
        .load(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("preferences for user {}", user_id)))?;
    Ok(respond(&state, preferences))
}
