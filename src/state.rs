use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::{GeminiClient, TextGenerator};
use crate::catalog::Catalog;
use crate::config::{AppConfig, ScheduleConfig};
use crate::db;
use crate::meals::{MemoryPlans, PgPlans, PlanStore};
use crate::plan::{Planner, ScheduleTemplate, TimeShift, WorkSchedule};
use crate::preferences::{MemoryPreferences, PgPreferences, PreferencesProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: &'static Catalog,
    pub preferences: Arc<dyn PreferencesProvider>,
    pub plans: Arc<dyn PlanStore>,
    pub text: Option<Arc<dyn TextGenerator>>,
    pub schedule: Option<Arc<dyn TimeShift>>,
}

fn schedule_from(config: &ScheduleConfig) -> Option<Arc<dyn TimeShift>> {
    match config {
        ScheduleConfig::Template(id) => match ScheduleTemplate::builtin(id) {
            Some(template) => Some(Arc::new(template)),
            None => {
                warn!(template = %id, "unknown schedule template; using nominal times");
                None
            }
        },
        ScheduleConfig::Work {
            start,
            commute_minutes,
        } => Some(Arc::new(WorkSchedule::weekdays(*start, *commute_minutes))),
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let mut state = Self::in_memory(config.clone());

        if let Some(url) = &config.database_url {
            let pool = db::connect(url).await?;
            db::migrate(&pool).await;
            state.preferences = Arc::new(PgPreferences::new(pool.clone()));
            state.plans = Arc::new(PgPlans::new(pool));
            info!("using postgres stores");
        } else {
            warn!("DATABASE_URL not set; preferences and plans are kept in memory");
        }

        if let Some(gemini) = &config.gemini {
            state.text = Some(Arc::new(GeminiClient::from(gemini)));
            info!(model = %gemini.model, "text service enabled");
        }
        Ok(state)
    }

    /// Built-in catalog, in-memory stores, no text service.
    pub fn in_memory(config: AppConfig) -> Self {
        let schedule = config.schedule.as_ref().and_then(schedule_from);
        Self {
            config: Arc::new(config),
            catalog: Catalog::builtin(),
            preferences: Arc::new(MemoryPreferences::default()),
            plans: Arc::new(MemoryPlans::default()),
            text: None,
            schedule,
        }
    }

    pub fn fake() -> Self {
        Self::in_memory(AppConfig::for_tests())
    }

    pub fn planner(&self) -> Planner<'_> {
        let planner = Planner::new(self.catalog).with_options(self.config.planner.clone());
        match self.schedule.as_deref() {
            Some(schedule) => planner.with_schedule(schedule),
            None => planner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DayLabel, MealSlot, MealTime, SequenceRandom};
    use time::macros::time;

    #[test]
    fn planner_applies_configured_schedule() {
        let mut config = AppConfig::for_tests();
        config.schedule = Some(ScheduleConfig::Work {
            start: MealTime::new(time!(13:00)),
            commute_minutes: 30,
        });
        let state = AppState::in_memory(config);

        let day = state
            .planner()
            .generate_day(1800, &["protein_chicken"], DayLabel::Mon, None, &mut SequenceRandom::zeros());
        let lunch = day.meal(MealSlot::Lunch).unwrap();
        assert_eq!(lunch.time.to_string(), "10:44");
    }

    #[test]
    fn unknown_template_falls_back_to_nominal() {
        let mut config = AppConfig::for_tests();
        config.schedule = Some(ScheduleConfig::Template("Z".into()));
        assert!(AppState::in_memory(config).schedule.is_none());
    }
}
