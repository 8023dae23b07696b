use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    AlternativesRequest, AlternativesResponse, DayQuery, GenerateWeekRequest, SwapRequest, TipsRequest,
    TipsResponse, WeekQuery,
};
use super::repo::StoredPlan;
use super::services;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::plan::{DayLabel, DayPlan, Meal};
use crate::state::AppState;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/week", get(get_week).post(generate_week))
        .route("/plans/day/:day", get(get_day))
        .route("/plans/meal/alternatives", post(meal_alternatives))
        .route("/plans/meal/swap", post(swap_item))
}

pub fn tips_routes() -> Router<AppState> {
    Router::new().route("/tips", post(tips))
}

#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<WeekQuery>,
) -> Result<Json<StoredPlan>, AppError> {
    let plan = services::load_week_for_user(&state, user.user_id, q.week_start.as_deref()).await?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn generate_week(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<GenerateWeekRequest>,
) -> Result<Json<StoredPlan>, AppError> {
    let plan = services::generate_week_for_user(&state, user.user_id, body.mode, body.week_start.as_deref()).await?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    user: AuthUser,
    Path(day): Path<DayLabel>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayPlan>, AppError> {
    let plan = services::generate_day_for_user(&state, user.user_id, day, q.avoid_protein_id.as_deref()).await?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn meal_alternatives(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AlternativesRequest>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let alternatives = services::meal_alternatives_for_user(&state, user.user_id, &body).await?;
    Ok(Json(AlternativesResponse { alternatives }))
}

#[instrument(skip(state))]
pub async fn swap_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<SwapRequest>,
) -> Result<Json<Meal>, AppError> {
    let meal = services::swap_item_in_plan(&state, user.user_id, &body).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, body))]
pub async fn tips(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TipsRequest>,
) -> Result<Json<TipsResponse>, AppError> {
    let tips = services::tips_for_user(&state, user.user_id, body.question.as_deref()).await?;
    Ok(Json(TipsResponse { tips }))
}
