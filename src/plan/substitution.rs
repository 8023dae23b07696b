//! Item swaps and whole-meal regeneration.

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Category, FoodEntry};
use crate::plan::generator::Planner;
use crate::plan::random::RandomSource;
use crate::plan::types::{item_signature, DayLabel, Meal, MealItem, MealSlot};

#[derive(Debug, Error, PartialEq)]
pub enum SubstitutionError {
    #[error("food `{0}` is not in the catalog")]
    UnknownFood(String),
    #[error("food `{0}` is not part of this meal")]
    ItemNotInMeal(String),
    #[error("`{replacement}` is {found:?}, expected {expected:?}")]
    CategoryMismatch {
        replacement: String,
        expected: Category,
        found: Category,
    },
}

/// Inputs for regenerating one slot of a day.
#[derive(Debug, Clone)]
pub struct MealRequest<'r, S> {
    pub total_calories: u32,
    pub liked_ids: &'r [S],
    pub day: DayLabel,
    pub slot: MealSlot,
    pub avoid_protein_id: Option<&'r str>,
    pub current_item_ids: &'r [String],
}

impl<'a> Planner<'a> {
    /// Other same-category catalog entries, in catalog order, up to the
    /// configured swap limit.
    pub fn item_swaps(&self, food_id: &str) -> Result<Vec<&'a FoodEntry>, SubstitutionError> {
        let item = self
            .catalog
            .get(food_id)
            .ok_or_else(|| SubstitutionError::UnknownFood(food_id.to_string()))?;
        Ok(self
            .catalog
            .by_category(item.category)
            .filter(|f| f.id != item.id)
            .take(self.options.swap_limit)
            .collect())
    }

    /// Replaces a single item in place. The meal's calorie figure is left
    /// untouched.
    pub fn apply_item_swap(
        &self,
        meal: &mut Meal,
        item_id: &str,
        replacement_id: &str,
    ) -> Result<(), SubstitutionError> {
        let replacement = self
            .catalog
            .get(replacement_id)
            .ok_or_else(|| SubstitutionError::UnknownFood(replacement_id.to_string()))?;
        let slot = meal
            .items
            .iter_mut()
            .find(|i| i.food_id == item_id)
            .ok_or_else(|| SubstitutionError::ItemNotInMeal(item_id.to_string()))?;
        if slot.category != replacement.category {
            return Err(SubstitutionError::CategoryMismatch {
                replacement: replacement.id.clone(),
                expected: slot.category,
                found: replacement.category,
            });
        }
        *slot = MealItem::from_entry(replacement);
        Ok(())
    }

    /// Re-runs the day generator up to the attempt bound and keeps meals for
    /// `request.slot` whose item set differs from the current one and from
    /// each other. Fewer than requested (even none) is a normal outcome.
    pub fn meal_alternatives<S, R>(&self, request: &MealRequest<'_, S>, rng: &mut R) -> Vec<Meal>
    where
        S: AsRef<str>,
        R: RandomSource + ?Sized,
    {
        let current = item_signature(request.current_item_ids.iter().map(String::as_str));
        let mut seen = vec![current];
        let mut found = Vec::new();

        for attempt in 0..self.options.regeneration_attempts {
            if found.len() >= self.options.max_alternatives {
                break;
            }
            let day = self.generate_day(
                request.total_calories,
                request.liked_ids,
                request.day,
                request.avoid_protein_id,
                rng,
            );
            let Some(meal) = day.meals.into_iter().find(|m| m.slot == request.slot) else {
                continue;
            };
            let signature = meal.signature();
            if seen.contains(&signature) {
                debug!(attempt, slot = ?request.slot, "duplicate candidate skipped");
                continue;
            }
            seen.push(signature);
            found.push(meal);
        }
        found
    }
}
