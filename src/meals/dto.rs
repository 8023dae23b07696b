use serde::{Deserialize, Serialize};

use crate::plan::{DayLabel, Meal, MealSlot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    #[default]
    Rules,
    Ai,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub week_start: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateWeekRequest {
    #[serde(default)]
    pub mode: PlanMode,
    pub week_start: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub avoid_protein_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    pub day: DayLabel,
    pub slot: MealSlot,
    #[serde(default)]
    pub current_item_ids: Vec<String>,
    pub avoid_protein_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub alternatives: Vec<Meal>,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub week_start: Option<String>,
    pub day: DayLabel,
    pub slot: MealSlot,
    pub item_id: String,
    pub replacement_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TipsRequest {
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: String,
}
