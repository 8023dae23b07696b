mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::state::AppState;
use axum::Router;

pub use dto::{PreferencesResponse, SavePreferencesRequest};
pub use repo::{MemoryPreferences, NewPreferences, PgPreferences, PreferencesProvider};
pub use services::PreferencesError;

/// A user's saved planning inputs. `version` grows by one on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub daily_calorie_target: u32,
    pub liked_food_ids: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::preferences_routes())
        .merge(handlers::admin_routes())
}
