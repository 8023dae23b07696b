use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Category, FoodEntry};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::plan::portion_label;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/:id/swaps", get(food_swaps))
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodQuery {
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct FoodView {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub portion: String,
}

impl From<&FoodEntry> for FoodView {
    fn from(entry: &FoodEntry) -> Self {
        Self {
            entry: entry.clone(),
            portion: portion_label(entry),
        }
    }
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<FoodQuery>,
) -> Json<Vec<FoodView>> {
    let foods = state
        .catalog
        .iter()
        .filter(|f| q.category.map_or(true, |c| f.category == c))
        .map(FoodView::from)
        .collect();
    Json(foods)
}

#[instrument(skip(state))]
pub async fn food_swaps(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<FoodView>>, AppError> {
    let swaps = state.planner().item_swaps(&id)?;
    Ok(Json(swaps.into_iter().map(FoodView::from).collect()))
}
