//! Deterministic meal-plan generation: pool selection, day and week
//! generation, portion labels and substitutions.

pub mod generator;
pub mod policy;
pub mod pool;
pub mod portion;
pub mod random;
pub mod schedule;
pub mod substitution;
pub mod types;
mod week;

pub use generator::{Planner, PlannerOptions};
pub use policy::{SlotPolicy, SlotSpec};
pub use pool::{select_pool, Pool};
pub use portion::{portion_for, portion_label, Portion, PortionUnit};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use schedule::{NominalTimes, ScheduleTemplate, TimeShift, WorkSchedule};
pub use substitution::{MealRequest, SubstitutionError};
pub use types::{DayLabel, DayPlan, MacroTotals, Meal, MealItem, MealSlot, MealTime, WeekPlan};

use crate::catalog::Catalog;

/// Day plan over the built-in catalog with default policy and fresh entropy.
pub fn generate_day<S: AsRef<str>>(
    total_calories: u32,
    liked_ids: &[S],
    day: DayLabel,
    avoid_protein_id: Option<&str>,
) -> DayPlan {
    Planner::new(Catalog::builtin()).generate_day(
        total_calories,
        liked_ids,
        day,
        avoid_protein_id,
        &mut ThreadRandom::new(),
    )
}

/// Week plan over the built-in catalog with default policy and fresh entropy.
pub fn generate_week<S: AsRef<str>>(total_calories: u32, liked_ids: &[S]) -> WeekPlan {
    Planner::new(Catalog::builtin()).generate_week(total_calories, liked_ids, &mut ThreadRandom::new())
}
