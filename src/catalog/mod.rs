//! Static food catalog: closed categories, nutrition per typical portion and
//! the affordability flag the pool selector falls back on.

mod foods;
pub mod handlers;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of food categories. Every lookup table keyed by category is an
/// exhaustive `match`, so a new variant fails to compile until it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AnimalProtein,
    Carbohydrate,
    Vegetable,
    Legume,
    Fruit,
    FatOrCondiment,
    Dairy,
    Snack,
    Beverage,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::AnimalProtein,
        Category::Carbohydrate,
        Category::Vegetable,
        Category::Legume,
        Category::Fruit,
        Category::FatOrCondiment,
        Category::Dairy,
        Category::Snack,
        Category::Beverage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::AnimalProtein => "Animal proteins",
            Category::Carbohydrate => "Carbohydrates",
            Category::Vegetable => "Vegetables & greens",
            Category::Legume => "Legumes",
            Category::Fruit => "Fruits",
            Category::FatOrCondiment => "Fats & condiments",
            Category::Dairy => "Dairy",
            Category::Snack => "Snacks",
            Category::Beverage => "Beverages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLabel {
    Cheap,
    Medium,
    Expensive,
}

/// One catalog row. Macros describe a single typical portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub category: Category,
    pub name: String,
    pub calories_per_portion: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    /// Grams, or milliliters for beverages.
    pub typical_portion_g: u32,
    pub price_label: PriceLabel,
    pub affordable: bool,
    #[serde(default)]
    pub contains_lactose: bool,
    #[serde(default)]
    pub contains_gluten: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate food id `{0}`")]
    DuplicateId(String),
    #[error("food `{id}` has a negative {field}")]
    NegativeMacro { id: String, field: &'static str },
}

/// Immutable food table. Built once, shared by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<FoodEntry>,
}

lazy_static::lazy_static! {
    static ref BUILTIN: Catalog = Catalog {
        entries: foods::builtin_entries(),
    };
}

impl Catalog {
    /// Validates id uniqueness and non-negative nutrition.
    pub fn from_entries(entries: Vec<FoodEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            let macros = [
                ("calorie value", entry.calories_per_portion),
                ("protein value", entry.protein_g),
                ("carbohydrate value", entry.carbs_g),
                ("fat value", entry.fat_g),
            ];
            if let Some((field, _)) = macros.iter().find(|(_, v)| *v < 0.0) {
                return Err(CatalogError::NegativeMacro {
                    id: entry.id.clone(),
                    field,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FoodEntry> {
        self.entries.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &FoodEntry> {
        self.entries.iter().filter(move |f| f.category == category)
    }
}

#[cfg(test)]
pub(crate) fn test_food(id: &str, category: Category, affordable: bool) -> FoodEntry {
    FoodEntry {
        id: id.to_string(),
        category,
        name: id.to_string(),
        calories_per_portion: 100.0,
        protein_g: 5.0,
        carbs_g: 10.0,
        fat_g: 2.0,
        typical_portion_g: 100,
        price_label: PriceLabel::Cheap,
        affordable,
        contains_lactose: false,
        contains_gluten: false,
    }
}
