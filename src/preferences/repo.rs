use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Preferences;

/// Validated input for a save; the store assigns version and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPreferences {
    pub daily_calorie_target: u32,
    pub liked_food_ids: Vec<String>,
}

/// Where preferences live. The generator never touches this directly.
#[async_trait]
pub trait PreferencesProvider: Send + Sync {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Preferences>>;
    /// Stores `new` as the next version (1 for a first save). The bump is
    /// atomic per user.
    async fn save(&self, user_id: Uuid, new: NewPreferences) -> anyhow::Result<Preferences>;
}

#[derive(Default)]
pub struct MemoryPreferences {
    inner: RwLock<HashMap<Uuid, Preferences>>,
}

#[async_trait]
impl PreferencesProvider for MemoryPreferences {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Preferences>> {
        Ok(self.inner.read().await.get(&user_id).cloned())
    }

    async fn save(&self, user_id: Uuid, new: NewPreferences) -> anyhow::Result<Preferences> {
        let mut inner = self.inner.write().await;
        let version = inner.get(&user_id).map(|p| p.version + 1).unwrap_or(1);
        let preferences = Preferences {
            version,
            timestamp: OffsetDateTime::now_utc(),
            daily_calorie_target: new.daily_calorie_target,
            liked_food_ids: new.liked_food_ids,
        };
        inner.insert(user_id, preferences.clone());
        Ok(preferences)
    }
}

#[derive(Debug, FromRow)]
struct PreferencesRow {
    version: i32,
    saved_at: OffsetDateTime,
    daily_calorie_target: i32,
    liked_food_ids: Json<Vec<String>>,
}

impl From<PreferencesRow> for Preferences {
    fn from(r: PreferencesRow) -> Self {
        Self {
            version: r.version.max(0) as u32,
            timestamp: r.saved_at,
            daily_calorie_target: r.daily_calorie_target.max(0) as u32,
            liked_food_ids: r.liked_food_ids.0,
        }
    }
}

pub struct PgPreferences {
    db: PgPool,
}

impl PgPreferences {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PreferencesProvider for PgPreferences {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Preferences>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT version, saved_at, daily_calorie_target, liked_food_ids
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("load preferences")?;
        Ok(row.map(Preferences::from))
    }

    async fn save(&self, user_id: Uuid, new: NewPreferences) -> anyhow::Result<Preferences> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            INSERT INTO user_preferences (user_id, version, saved_at, daily_calorie_target, liked_food_ids)
            VALUES ($1, 1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET version = user_preferences.version + 1,
                saved_at = EXCLUDED.saved_at,
                daily_calorie_target = EXCLUDED.daily_calorie_target,
                liked_food_ids = EXCLUDED.liked_food_ids
            RETURNING version, saved_at, daily_calorie_target, liked_food_ids
            "#,
        )
        .bind(user_id)
        .bind(OffsetDateTime::now_utc())
        .bind(new.daily_calorie_target as i32)
        .bind(Json(&new.liked_food_ids))
        .fetch_one(&self.db)
        .await
        .context("save preferences")?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_prefs(target: u32) -> NewPreferences {
        NewPreferences {
            daily_calorie_target: target,
            liked_food_ids: vec!["protein_chicken".into()],
        }
    }

    #[tokio::test]
    async fn concurrent_saves_get_distinct_versions() {
        let store = MemoryPreferences::default();
        let user = Uuid::new_v4();

        let (a, b) = tokio::join!(store.save(user, new_prefs(1800)), store.save(user, new_prefs(2200)));
        let mut versions = vec![a.unwrap().version, b.unwrap().version];
        versions.sort_unstable();
        assert_eq!(versions, vec![1, 2]);

        let third = store.save(user, new_prefs(2000)).await.unwrap();
        assert_eq!(third.version, 3);
        assert_eq!(store.load(user).await.unwrap(), Some(third));
    }

    #[tokio::test]
    async fn versions_are_per_user() {
        let store = MemoryPreferences::default();
        store.save(Uuid::new_v4(), new_prefs(1800)).await.unwrap();
        let other = store.save(Uuid::new_v4(), new_prefs(1800)).await.unwrap();
        assert_eq!(other.version, 1);
    }
}
