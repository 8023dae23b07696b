use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AlternativesRequest, PlanMode, SwapRequest};
use super::repo::{PlanSource, StoredPlan};
use crate::ai::{parse_external_plan, plan_prompt, tips_prompt, AiError};
use crate::error::AppError;
use crate::plan::{DayLabel, DayPlan, Meal, MealRequest, Planner, ThreadRandom, WeekPlan};
use crate::preferences::services::load_required;
use crate::preferences::Preferences;
use crate::state::AppState;

const TIPS_UNAVAILABLE: &str = "could not generate tips";

pub fn monday_of(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

/// Parses `YYYY-MM-DD` and snaps it to that week's Monday. No value means the
/// current week.
pub fn resolve_week_start(raw: Option<&str>, today: Date) -> Result<Date, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(monday_of(today)),
        Some(s) => Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(monday_of)
            .map_err(|_| AppError::BadRequest(format!("week_start `{}` is not YYYY-MM-DD", s))),
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

async fn ai_week(state: &AppState, planner: &Planner<'_>, prefs: &Preferences) -> Result<WeekPlan, AiError> {
    let text = state.text.as_ref().ok_or(AiError::NotConfigured)?;
    let prompt = plan_prompt(
        prefs.daily_calorie_target,
        &prefs.liked_food_ids,
        planner.catalog(),
        planner.policy(),
    );
    let raw = text.generate(&prompt).await?;
    parse_external_plan(&raw)?.into_week_plan(planner.catalog(), prefs.daily_calorie_target)
}

fn rules_week(planner: &Planner<'_>, prefs: &Preferences) -> WeekPlan {
    planner.generate_week(
        prefs.daily_calorie_target,
        &prefs.liked_food_ids,
        &mut ThreadRandom::new(),
    )
}

/// Generates and stores the week, replacing any plan kept for that week.
/// The model-driven path falls back to the rule-based generator on any
/// failure.
pub async fn generate_week_for_user(
    state: &AppState,
    user_id: Uuid,
    mode: PlanMode,
    week_start: Option<&str>,
) -> Result<StoredPlan, AppError> {
    let week_start = resolve_week_start(week_start, today())?;
    let prefs = load_required(state.preferences.as_ref(), user_id).await?;
    let planner = state.planner();

    let (plan, source) = match mode {
        PlanMode::Rules => (rules_week(&planner, &prefs), PlanSource::Rules),
        PlanMode::Ai => match ai_week(state, &planner, &prefs).await {
            Ok(plan) => (plan, PlanSource::Ai),
            Err(e) => {
                warn!(%user_id, error = %e, "ai plan unavailable, falling back to rules");
                (rules_week(&planner, &prefs), PlanSource::Rules)
            }
        },
    };

    let stored = StoredPlan {
        user_id,
        week_start,
        source,
        total_calories: prefs.daily_calorie_target,
        created_at: OffsetDateTime::now_utc(),
        revision: 0,
        plan,
    };
    let stored = state.plans.save(&stored).await?;
    info!(%user_id, %week_start, source = source.as_str(), revision = stored.revision, "week plan stored");
    Ok(stored)
}

pub async fn load_week_for_user(
    state: &AppState,
    user_id: Uuid,
    week_start: Option<&str>,
) -> Result<StoredPlan, AppError> {
    let week_start = resolve_week_start(week_start, today())?;
    state
        .plans
        .load(user_id, week_start)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plan for week {}", week_start)))
}

/// Fresh day plan for printing; nothing is stored.
pub async fn generate_day_for_user(
    state: &AppState,
    user_id: Uuid,
    day: DayLabel,
    avoid_protein_id: Option<&str>,
) -> Result<DayPlan, AppError> {
    let prefs = load_required(state.preferences.as_ref(), user_id).await?;
    Ok(state.planner().generate_day(
        prefs.daily_calorie_target,
        &prefs.liked_food_ids,
        day,
        avoid_protein_id,
        &mut ThreadRandom::new(),
    ))
}

pub async fn meal_alternatives_for_user(
    state: &AppState,
    user_id: Uuid,
    req: &AlternativesRequest,
) -> Result<Vec<Meal>, AppError> {
    let prefs = load_required(state.preferences.as_ref(), user_id).await?;
    let request = MealRequest {
        total_calories: prefs.daily_calorie_target,
        liked_ids: &prefs.liked_food_ids,
        day: req.day,
        slot: req.slot,
        avoid_protein_id: req.avoid_protein_id.as_deref(),
        current_item_ids: &req.current_item_ids,
    };
    Ok(state
        .planner()
        .meal_alternatives(&request, &mut ThreadRandom::new()))
}

/// Replaces one item inside the stored week and persists the result. The
/// write is refused with [`AppError::Conflict`] when the week changed after
/// it was loaded.
pub async fn swap_item_in_plan(state: &AppState, user_id: Uuid, req: &SwapRequest) -> Result<Meal, AppError> {
    let mut stored = load_week_for_user(state, user_id, req.week_start.as_deref()).await?;
    let meal = stored
        .plan
        .day_mut(req.day)
        .and_then(|d| d.meal_mut(req.slot))
        .ok_or_else(|| AppError::NotFound(format!("{} on {}", req.slot, req.day)))?;

    state
        .planner()
        .apply_item_swap(meal, &req.item_id, &req.replacement_id)?;
    let updated = meal.clone();

    let written = state
        .plans
        .update(&stored)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("plan for week {} changed, reload and retry", stored.week_start)))?;
    info!(%user_id, revision = written.revision, day = %req.day, slot = ?req.slot, item = %req.item_id, replacement = %req.replacement_id, "item swapped");
    Ok(updated)
}

pub async fn tips_for_user(state: &AppState, user_id: Uuid, question: Option<&str>) -> Result<String, AppError> {
    let text = state
        .text
        .as_ref()
        .ok_or_else(|| AppError::Upstream(TIPS_UNAVAILABLE.into()))?;
    let target = state
        .preferences
        .load(user_id)
        .await?
        .map(|p| p.daily_calorie_target);

    text.generate(&tips_prompt(target, question)).await.map_err(|e| {
        warn!(%user_id, error = %e, "tips generation failed");
        AppError::Upstream(TIPS_UNAVAILABLE.into())
    })
}
