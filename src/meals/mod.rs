mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::PlanMode;
pub use repo::{MemoryPlans, PgPlans, PlanSource, PlanStore, StoredPlan};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::plan_routes())
        .merge(handlers::tips_routes())
}
