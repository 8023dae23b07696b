//! Human-readable portion labels. Pure: depends only on the entry's id,
//! category and typical portion.

use std::fmt;

use serde::Serialize;

use crate::catalog::{Category, FoodEntry};

const EGG_IDS: &[&str] = &["protein_eggs", "snack_boiled_eggs"];
const SLICED_BREAD_ID: &str = "carb_wholegrain_bread";
const CHEESE_IDS: &[&str] = &["dairy_white_cheese", "dairy_fresh_cheese"];
const TOAST_ID: &str = "snack_wholegrain_toast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortionUnit {
    Units,
    Slices,
    Grams,
    Milliliters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Portion {
    pub quantity: u32,
    pub unit: PortionUnit,
}

impl Portion {
    pub fn units(quantity: u32) -> Self {
        Self { quantity, unit: PortionUnit::Units }
    }

    pub fn slices(quantity: u32) -> Self {
        Self { quantity, unit: PortionUnit::Slices }
    }
}

impl fmt::Display for Portion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = self.quantity != 1;
        match self.unit {
            PortionUnit::Units if plural => write!(f, "{} units", self.quantity),
            PortionUnit::Units => write!(f, "{} unit", self.quantity),
            PortionUnit::Slices if plural => write!(f, "{} slices", self.quantity),
            PortionUnit::Slices => write!(f, "{} slice", self.quantity),
            PortionUnit::Grams => write!(f, "{} g", self.quantity),
            PortionUnit::Milliliters => write!(f, "{} ml", self.quantity),
        }
    }
}

/// Rules are checked top to bottom; the first match wins.
pub fn portion_for(item: &FoodEntry) -> Portion {
    let id = item.id.as_str();
    if EGG_IDS.contains(&id) {
        return Portion::units(2);
    }
    if item.category == Category::Fruit {
        return Portion::units(1);
    }
    if id == SLICED_BREAD_ID {
        return Portion::slices(2);
    }
    if CHEESE_IDS.contains(&id) {
        return Portion::slices(1);
    }
    if id == TOAST_ID {
        return Portion::units(3);
    }
    let unit = match item.category {
        Category::Beverage => PortionUnit::Milliliters,
        Category::AnimalProtein
        | Category::Carbohydrate
        | Category::Vegetable
        | Category::Legume
        | Category::Fruit
        | Category::FatOrCondiment
        | Category::Dairy
        | Category::Snack => PortionUnit::Grams,
    };
    Portion {
        quantity: item.typical_portion_g,
        unit,
    }
}

pub fn portion_label(item: &FoodEntry) -> String {
    portion_for(item).to_string()
}
