//! Slot policy: calorie shares, nominal clock times and per-slot eligibility
//! rules.

use serde::Serialize;
use thiserror::Error;
use time::macros::time;

use crate::catalog::{Category, FoodEntry};
use crate::plan::types::{MealSlot, MealTime};

pub const BREAKFAST_CARBS: &[&str] = &[
    "carb_wholegrain_bread",
    "carb_tapioca",
    "carb_oats",
    "carb_corn_couscous",
];

pub const LUNCH_CARBS: &[&str] = &[
    "carb_brown_rice",
    "carb_wholegrain_pasta",
    "carb_sweet_potato",
    "carb_cassava",
    "carb_quinoa",
    "carb_farofa",
];

pub const LIGHT_DINNER_CARBS: &[&str] = &[
    "carb_sweet_potato",
    "carb_cassava",
    "carb_quinoa",
    "carb_brown_rice",
];

pub const BREAKFAST_BEVERAGES: &[&str] = &["bev_coffee", "bev_natural_juice", "bev_tea"];

/// Hard-coded fallbacks for light slots when the pool lacks them.
pub const YOGURT_ID: &str = "dairy_yogurt";
pub const TOAST_ID: &str = "snack_wholegrain_toast";
pub const OATS_ID: &str = "carb_oats";
pub const TEA_ID: &str = "bev_tea";

/// Carbohydrate subset a slot may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarbRule {
    Breakfast,
    Lunch,
    LightDinner,
}

impl CarbRule {
    pub fn allows(self, food: &FoodEntry) -> bool {
        if food.category != Category::Carbohydrate {
            return false;
        }
        let ids = match self {
            CarbRule::Breakfast => BREAKFAST_CARBS,
            CarbRule::Lunch => LUNCH_CARBS,
            CarbRule::LightDinner => LIGHT_DINNER_CARBS,
        };
        ids.contains(&food.id.as_str())
    }
}

pub fn is_breakfast_beverage(food: &FoodEntry) -> bool {
    food.category == Category::Beverage && BREAKFAST_BEVERAGES.contains(&food.id.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotSpec {
    pub slot: MealSlot,
    pub share: f64,
    pub nominal_time: MealTime,
}

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("slot shares sum to {0}, expected 1.0")]
    SharesDoNotSumToOne(f64),
    #[error("slot {0:?} configured more than once")]
    DuplicateSlot(MealSlot),
    #[error("slot {0:?} is missing")]
    MissingSlot(MealSlot),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotPolicy {
    specs: Vec<SlotSpec>,
}

const DEFAULT_SPECS: [SlotSpec; 6] = [
    SlotSpec { slot: MealSlot::Breakfast, share: 0.20, nominal_time: MealTime::new(time!(8:20)) },
    SlotSpec { slot: MealSlot::MorningSnack, share: 0.10, nominal_time: MealTime::new(time!(6:10)) },
    SlotSpec { slot: MealSlot::Lunch, share: 0.30, nominal_time: MealTime::new(time!(12:30)) },
    SlotSpec { slot: MealSlot::AfternoonSnack, share: 0.10, nominal_time: MealTime::new(time!(15:30)) },
    SlotSpec { slot: MealSlot::Dinner, share: 0.25, nominal_time: MealTime::new(time!(19:30)) },
    SlotSpec { slot: MealSlot::EveningSnack, share: 0.05, nominal_time: MealTime::new(time!(21:30)) },
];

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            specs: DEFAULT_SPECS.to_vec(),
        }
    }
}

impl SlotPolicy {
    /// Every slot exactly once, shares summing to 1.0.
    pub fn new(specs: Vec<SlotSpec>) -> Result<Self, PolicyError> {
        for slot in MealSlot::ALL {
            match specs.iter().filter(|s| s.slot == slot).count() {
                0 => return Err(PolicyError::MissingSlot(slot)),
                1 => {}
                _ => return Err(PolicyError::DuplicateSlot(slot)),
            }
        }
        let total: f64 = specs.iter().map(|s| s.share).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(PolicyError::SharesDoNotSumToOne(total));
        }
        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[SlotSpec] {
        &self.specs
    }

    pub fn spec(&self, slot: MealSlot) -> Option<&SlotSpec> {
        self.specs.iter().find(|s| s.slot == slot)
    }

    pub fn share(&self, slot: MealSlot) -> f64 {
        self.spec(slot).map(|s| s.share).unwrap_or(0.0)
    }

    /// `round(total * share)`, computed independently per slot.
    pub fn calories_for(&self, slot: MealSlot, total_calories: u32) -> u32 {
        (total_calories as f64 * self.share(slot)).round() as u32
    }
}
