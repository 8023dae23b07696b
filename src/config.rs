use anyhow::Context;
use serde::Deserialize;

use crate::plan::{MealTime, PlannerOptions};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

/// Which time-shift policy sits on top of the nominal slot times.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleConfig {
    Template(String),
    Work {
        start: MealTime,
        commute_minutes: u16,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub gemini: Option<GeminiConfig>,
    pub planner: PlannerOptions,
    pub schedule: Option<ScheduleConfig>,
}

/// `default` when the variable is unset or empty; an error when it is set
/// but does not parse.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} `{}` is not a valid value", key, v)),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealplan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealplan-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60)?,
        };
        let gemini = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(|api_key| GeminiConfig {
                api_key,
                model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
            });

        let defaults = PlannerOptions::default();
        let planner = PlannerOptions {
            liked_threshold: env_or("PLAN_LIKED_THRESHOLD", defaults.liked_threshold)?,
            regeneration_attempts: env_or("PLAN_REGEN_ATTEMPTS", defaults.regeneration_attempts)?,
            max_alternatives: env_or("PLAN_MAX_ALTERNATIVES", defaults.max_alternatives)?,
            swap_limit: env_or("PLAN_SWAP_LIMIT", defaults.swap_limit)?,
        };

        let schedule = match (std::env::var("SCHEDULE_TEMPLATE"), std::env::var("WORK_START")) {
            (Ok(template), _) if !template.is_empty() => Some(ScheduleConfig::Template(template)),
            (_, Ok(start)) if !start.is_empty() => Some(ScheduleConfig::Work {
                start: start
                    .parse()
                    .with_context(|| format!("WORK_START `{}` is not HH:MM", start))?,
                commute_minutes: env_or("COMMUTE_MINUTES", 30)?,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt,
            gemini,
            planner,
            schedule,
        })
    }

    /// In-memory configuration for tests and local runs.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            gemini: None,
            planner: PlannerOptions::default(),
            schedule: None,
        }
    }
}
