use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::plan::WeekPlan;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Rules,
    Ai,
}

impl PlanSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanSource::Rules => "rules",
            PlanSource::Ai => "ai",
        }
    }

    fn from_db(s: &str) -> Self {
        match s {
            "ai" => PlanSource::Ai,
            _ => PlanSource::Rules,
        }
    }
}

/// A generated week kept for one user and one Monday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub week_start: Date,
    pub source: PlanSource,
    pub total_calories: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Bumped by the store on every write to this user and week.
    pub revision: u32,
    pub plan: WeekPlan,
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn load(&self, user_id: Uuid, week_start: Date) -> anyhow::Result<Option<StoredPlan>>;
    /// Replaces any plan already kept for the same user and week and returns
    /// it with its new revision. `plan.revision` is ignored.
    async fn save(&self, plan: &StoredPlan) -> anyhow::Result<StoredPlan>;
    /// Writes `plan.plan` only if the stored revision still equals
    /// `plan.revision`. `None` means someone else wrote in between.
    async fn update(&self, plan: &StoredPlan) -> anyhow::Result<Option<StoredPlan>>;
}

#[derive(Default)]
pub struct MemoryPlans {
    inner: RwLock<HashMap<(Uuid, Date), StoredPlan>>,
}

#[async_trait]
impl PlanStore for MemoryPlans {
    async fn load(&self, user_id: Uuid, week_start: Date) -> anyhow::Result<Option<StoredPlan>> {
        Ok(self.inner.read().await.get(&(user_id, week_start)).cloned())
    }

    async fn save(&self, plan: &StoredPlan) -> anyhow::Result<StoredPlan> {
        let mut inner = self.inner.write().await;
        let key = (plan.user_id, plan.week_start);
        let revision = inner.get(&key).map(|p| p.revision + 1).unwrap_or(1);
        let stored = StoredPlan {
            revision,
            ..plan.clone()
        };
        inner.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, plan: &StoredPlan) -> anyhow::Result<Option<StoredPlan>> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.get_mut(&(plan.user_id, plan.week_start)) else {
            return Ok(None);
        };
        if current.revision != plan.revision {
            return Ok(None);
        }
        current.plan = plan.plan.clone();
        current.revision += 1;
        Ok(Some(current.clone()))
    }
}

#[derive(Debug, FromRow)]
struct PlanRow {
    user_id: Uuid,
    week_start: Date,
    source: String,
    total_calories: i32,
    plan: Json<WeekPlan>,
    created_at: OffsetDateTime,
    revision: i32,
}

impl From<PlanRow> for StoredPlan {
    fn from(r: PlanRow) -> Self {
        Self {
            user_id: r.user_id,
            week_start: r.week_start,
            source: PlanSource::from_db(&r.source),
            total_calories: r.total_calories.max(0) as u32,
            created_at: r.created_at,
            revision: r.revision.max(0) as u32,
            plan: r.plan.0,
        }
    }
}

pub struct PgPlans {
    db: PgPool,
}

impl PgPlans {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlans {
    async fn load(&self, user_id: Uuid, week_start: Date) -> anyhow::Result<Option<StoredPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT user_id, week_start, source, total_calories, plan, created_at, revision
            FROM meal_plans
            WHERE user_id = $1 AND week_start = $2
            "#,
        )
        .bind(user_id)
        .bind(week_start)
        .fetch_optional(&self.db)
        .await
        .context("load meal plan")?;
        Ok(row.map(StoredPlan::from))
    }

    async fn save(&self, plan: &StoredPlan) -> anyhow::Result<StoredPlan> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO meal_plans (user_id, week_start, source, total_calories, plan, created_at, revision)
            VALUES ($1, $2, $3, $4, $5, $6, 1)
            ON CONFLICT (user_id, week_start) DO UPDATE
            SET source = EXCLUDED.source,
                total_calories = EXCLUDED.total_calories,
                plan = EXCLUDED.plan,
                created_at = EXCLUDED.created_at,
                revision = meal_plans.revision + 1
            RETURNING user_id, week_start, source, total_calories, plan, created_at, revision
            "#,
        )
        .bind(plan.user_id)
        .bind(plan.week_start)
        .bind(plan.source.as_str())
        .bind(plan.total_calories as i32)
        .bind(Json(&plan.plan))
        .bind(plan.created_at)
        .fetch_one(&self.db)
        .await
        .context("save meal plan")?;
        Ok(row.into())
    }

    async fn update(&self, plan: &StoredPlan) -> anyhow::Result<Option<StoredPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            UPDATE meal_plans
            SET plan = $3, revision = revision + 1
            WHERE user_id = $1 AND week_start = $2 AND revision = $4
            RETURNING user_id, week_start, source, total_calories, plan, created_at, revision
            "#,
        )
        .bind(plan.user_id)
        .bind(plan.week_start)
        .bind(Json(&plan.plan))
        .bind(plan.revision as i32)
        .fetch_optional(&self.db)
        .await
        .context("update meal plan")?;
        Ok(row.map(StoredPlan::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn stored(user_id: Uuid, source: PlanSource) -> StoredPlan {
        StoredPlan {
            user_id,
            week_start: date!(2024 - 06 - 03),
            source,
            total_calories: 1800,
            created_at: datetime!(2024-06-01 10:00 UTC),
            revision: 0,
            plan: WeekPlan { days: Vec::new() },
        }
    }

    #[tokio::test]
    async fn memory_store_replaces_same_week() {
        let store = MemoryPlans::default();
        let user = Uuid::new_v4();

        let first = store.save(&stored(user, PlanSource::Rules)).await.unwrap();
        assert_eq!(first.revision, 1);
        let second = store.save(&stored(user, PlanSource::Ai)).await.unwrap();
        assert_eq!(second.revision, 2);

        let loaded = store.load(user, date!(2024 - 06 - 03)).await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert!(store.load(user, date!(2024 - 06 - 10)).await.unwrap().is_none());
        assert!(store.load(Uuid::new_v4(), date!(2024 - 06 - 03)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_update_is_refused() {
        let store = MemoryPlans::default();
        let user = Uuid::new_v4();
        let saved = store.save(&stored(user, PlanSource::Rules)).await.unwrap();

        let mut first = saved.clone();
        first.plan.days.clear();
        let written = store.update(&first).await.unwrap().unwrap();
        assert_eq!(written.revision, saved.revision + 1);

        // a second writer still holding the old revision loses
        let second = saved.clone();
        assert!(store.update(&second).await.unwrap().is_none());
        assert_eq!(store.load(user, saved.week_start).await.unwrap(), Some(written));
    }

    #[tokio::test]
    async fn update_without_stored_plan_is_refused() {
        let store = MemoryPlans::default();
        assert!(store.update(&stored(Uuid::new_v4(), PlanSource::Rules)).await.unwrap().is_none());
    }

    #[test]
    fn week_start_serializes_as_iso_date() {
        let json = serde_json::to_value(stored(Uuid::nil(), PlanSource::Rules)).unwrap();
        assert_eq!(json["week_start"], "2024-06-03");
        assert_eq!(json["source"], "rules");
    }
}
