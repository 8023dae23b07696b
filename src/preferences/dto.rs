use serde::{Deserialize, Serialize};

use super::Preferences;

/// Request body for saving preferences.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePreferencesRequest {
    pub daily_calorie_target: u32,
    pub liked_food_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    #[serde(flatten)]
    pub preferences: Preferences,
    /// Whether enough liked foods exist for a liked-only pool.
    pub personalized: bool,
}
