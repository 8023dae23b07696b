use std::collections::HashSet;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::dto::SavePreferencesRequest;
use super::repo::{NewPreferences, PreferencesProvider};
use super::Preferences;
use crate::catalog::Catalog;
use crate::error::AppError;

pub const MIN_CALORIES: u32 = 1000;
pub const MAX_CALORIES: u32 = 4000;
pub const MIN_LIKED_TO_SAVE: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum PreferencesError {
    #[error("daily calorie target {0} is outside 1000..=4000")]
    CaloriesOutOfRange(u32),
    #[error("pick at least {required} liked foods (got {found})")]
    TooFewLikedFoods { found: usize, required: usize },
    #[error("unknown food id `{0}`")]
    UnknownFood(String),
}

/// Checks a save request against the catalog and returns the cleaned liked
/// list: unique ids, first occurrence order.
pub fn validate(catalog: &Catalog, req: &SavePreferencesRequest) -> Result<Vec<String>, PreferencesError> {
    if !(MIN_CALORIES..=MAX_CALORIES).contains(&req.daily_calorie_target) {
        return Err(PreferencesError::CaloriesOutOfRange(req.daily_calorie_target));
    }

    let mut seen = HashSet::new();
    let mut liked = Vec::with_capacity(req.liked_food_ids.len());
    for id in &req.liked_food_ids {
        let id = id.trim();
        if !catalog.contains(id) {
            return Err(PreferencesError::UnknownFood(id.to_string()));
        }
        if seen.insert(id.to_string()) {
            liked.push(id.to_string());
        }
    }

    if liked.len() < MIN_LIKED_TO_SAVE {
        return Err(PreferencesError::TooFewLikedFoods {
            found: liked.len(),
            required: MIN_LIKED_TO_SAVE,
        });
    }
    Ok(liked)
}

pub async fn save_preferences(
    provider: &dyn PreferencesProvider,
    catalog: &Catalog,
    user_id: Uuid,
    req: SavePreferencesRequest,
) -> Result<Preferences, AppError> {
    let liked_food_ids = validate(catalog, &req)?;
    let preferences = provider
        .save(
            user_id,
            NewPreferences {
                daily_calorie_target: req.daily_calorie_target,
                liked_food_ids,
            },
        )
        .await?;
    info!(%user_id, version = preferences.version, liked = preferences.liked_food_ids.len(), "preferences saved");
    Ok(preferences)
}

/// Loads preferences or fails with [`AppError::MissingPreferences`].
pub async fn load_required(provider: &dyn PreferencesProvider, user_id: Uuid) -> Result<Preferences, AppError> {
    provider
        .load(user_id)
        .await?
        .ok_or(AppError::MissingPreferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    fn request(calories: u32, liked: &[&str]) -> SavePreferencesRequest {
        SavePreferencesRequest {
            daily_calorie_target: calories,
            liked_food_ids: liked.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn rejects_out_of_range_calories() {
        let catalog = Catalog::builtin();
        let liked = ["protein_chicken", "carb_brown_rice", "veg_broccoli"];
        assert_eq!(
            validate(catalog, &request(900, &liked)),
            Err(PreferencesError::CaloriesOutOfRange(900))
        );
        assert_eq!(
            validate(catalog, &request(4001, &liked)),
            Err(PreferencesError::CaloriesOutOfRange(4001))
        );
        assert!(validate(catalog, &request(1000, &liked)).is_ok());
        assert!(validate(catalog, &request(4000, &liked)).is_ok());
    }

    #[test]
    fn rejects_unknown_food() {
        let err = validate(
            Catalog::builtin(),
            &request(2000, &["protein_chicken", "pizza", "veg_broccoli"]),
        )
        .unwrap_err();
        assert_eq!(err, PreferencesError::UnknownFood("pizza".into()));
    }

    #[test]
    fn duplicates_do_not_count_towards_minimum() {
        let err = validate(
            Catalog::builtin(),
            &request(2000, &["protein_chicken", "protein_chicken", "veg_broccoli"]),
        )
        .unwrap_err();
        assert_eq!(err, PreferencesError::TooFewLikedFoods { found: 2, required: 3 });
    }

    #[tokio::test]
    async fn save_bumps_version() {
        let provider = MemoryPreferences::default();
        let user = Uuid::new_v4();
        let liked = ["protein_chicken", "carb_brown_rice", "veg_broccoli"];

        let first = save_preferences(&provider, Catalog::builtin(), user, request(1800, &liked))
            .await
            .unwrap();
        assert_eq!(first.version, 1);

        let second = save_preferences(&provider, Catalog::builtin(), user, request(2200, &liked))
            .await
            .unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.daily_calorie_target, 2200);

        let loaded = load_required(&provider, user).await.unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn concurrent_saves_both_bump_version() {
        let provider = MemoryPreferences::default();
        let user = Uuid::new_v4();
        let liked = ["protein_chicken", "carb_brown_rice", "veg_broccoli"];

        let (a, b) = tokio::join!(
            save_preferences(&provider, Catalog::builtin(), user, request(1800, &liked)),
            save_preferences(&provider, Catalog::builtin(), user, request(2200, &liked)),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.version, b.version);
        assert_eq!(a.version.max(b.version), 2);
    }

    #[tokio::test]
    async fn missing_preferences_is_an_error() {
        let provider = MemoryPreferences::default();
        let err = load_required(&provider, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::MissingPreferences));
    }
}
