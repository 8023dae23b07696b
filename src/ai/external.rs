//! Strict reading of the JSON week plan returned by the text service.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::AiError;
use crate::catalog::{Catalog, Category};
use crate::plan::{DayLabel, DayPlan, Meal, MealItem, MealSlot, MealTime, WeekPlan};

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"```[a-zA-Z]*\n?").expect("valid fence regex");
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalPlan {
    pub days: Vec<ExternalDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalDay {
    #[serde(default)]
    pub day_name: String,
    pub day_index: usize,
    pub meals: Vec<ExternalMeal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalMeal {
    pub name: String,
    pub time: String,
    #[serde(default)]
    pub items: Vec<ExternalItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalItem {
    pub food_id: String,
    pub food_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub quantity_g: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

fn malformed(msg: impl Into<String>) -> AiError {
    AiError::MalformedExternalPlan(msg.into())
}

/// Parses raw service text, tolerating markdown fences, and checks the shape:
/// seven days indexed 0..6, known meal names, `HH:MM` times.
pub fn parse_external_plan(text: &str) -> Result<ExternalPlan, AiError> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let plan: ExternalPlan =
        serde_json::from_str(cleaned.trim()).map_err(|e| malformed(format!("invalid json: {}", e)))?;

    if plan.days.len() != 7 {
        return Err(malformed(format!("expected 7 days, got {}", plan.days.len())));
    }
    let mut seen = [false; 7];
    for day in &plan.days {
        let slot = seen
            .get_mut(day.day_index)
            .ok_or_else(|| malformed(format!("day_index {} out of range", day.day_index)))?;
        if *slot {
            return Err(malformed(format!("day_index {} repeated", day.day_index)));
        }
        *slot = true;

        for meal in &day.meals {
            if MealSlot::from_external_name(&meal.name).is_none() {
                return Err(malformed(format!("unknown meal name `{}`", meal.name)));
            }
            if meal.time.parse::<MealTime>().is_err() {
                return Err(malformed(format!("invalid time `{}`", meal.time)));
            }
        }
    }
    Ok(plan)
}

fn category_from_label(label: &str) -> Option<Category> {
    let l = label.trim().to_lowercase();
    let category = if l.contains("prote") {
        Category::AnimalProtein
    } else if l.contains("carb") {
        Category::Carbohydrate
    } else if l.contains("veg") || l.contains("verdura") {
        Category::Vegetable
    } else if l.contains("legum") {
        Category::Legume
    } else if l.contains("fru") {
        Category::Fruit
    } else if l.contains("fat") || l.contains("gordura") || l.contains("condiment") {
        Category::FatOrCondiment
    } else if l.contains("dairy") || l.contains("latic") {
        Category::Dairy
    } else if l.contains("snack") || l.contains("lanche") {
        Category::Snack
    } else if l.contains("bev") || l.contains("bebida") {
        Category::Beverage
    } else {
        return None;
    };
    Some(category)
}

impl ExternalPlan {
    /// Converts a validated plan. Item categories come from the catalog when
    /// the id is known, otherwise from the reported category label.
    pub fn into_week_plan(self, catalog: &Catalog, total_calories: u32) -> Result<WeekPlan, AiError> {
        let mut days = self.days;
        days.sort_by_key(|d| d.day_index);

        let days = days
            .into_iter()
            .map(|d| convert_day(d, catalog, total_calories))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WeekPlan { days })
    }
}

fn convert_day(day: ExternalDay, catalog: &Catalog, total_calories: u32) -> Result<DayPlan, AiError> {
    let label = DayLabel::from_index(day.day_index)
        .ok_or_else(|| malformed(format!("day_index {} out of range", day.day_index)))?;

    let mut meals = Vec::with_capacity(day.meals.len());
    for meal in day.meals {
        let slot = MealSlot::from_external_name(&meal.name)
            .ok_or_else(|| malformed(format!("unknown meal name `{}`", meal.name)))?;
        let time: MealTime = meal
            .time
            .parse()
            .map_err(|_| malformed(format!("invalid time `{}`", meal.time)))?;

        let calories = meal.items.iter().map(|i| i.calories.max(0.0)).sum::<f64>().round() as u32;
        let items = meal
            .items
            .into_iter()
            .map(|item| {
                let category = catalog
                    .get(&item.food_id)
                    .map(|f| f.category)
                    .or_else(|| category_from_label(&item.category))
                    .ok_or_else(|| malformed(format!("cannot place `{}` in a category", item.food_id)))?;
                Ok(MealItem {
                    food_id: item.food_id,
                    name: item.food_name,
                    category,
                    portion: item.unit,
                })
            })
            .collect::<Result<Vec<_>, AiError>>()?;

        meals.push(Meal {
            slot,
            time,
            items,
            calories,
        });
    }
    meals.sort_by_key(|m| m.time);

    let main_protein_id = meals
        .iter()
        .find(|m| m.slot == MealSlot::Lunch)
        .and_then(|m| m.items.iter().find(|i| i.category == Category::AnimalProtein))
        .map(|i| i.food_id.clone());

    Ok(DayPlan {
        day: label,
        meals,
        total_calories,
        main_protein_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(index: usize) -> serde_json::Value {
        json!({
            "day_name": "Day",
            "day_index": index,
            "meals": [
                {
                    "name": "Jantar",
                    "time": "19:30",
                    "items": [
                        { "food_id": "protein_beef", "food_name": "Beef", "category": "Proteínas (Animais)",
                          "unit": "120 g", "quantity": 1, "quantity_g": 120, "calories": 260.4,
                          "protein_g": 31.2, "carbs_g": 0, "fat_g": 14.4 }
                    ]
                },
                {
                    "name": "Almoço",
                    "time": "12:30",
                    "items": [
                        { "food_id": "protein_chicken", "food_name": "Chicken", "category": "Proteínas (Animais)",
                          "unit": "150 g", "quantity": 1, "quantity_g": 150, "calories": 247.5 },
                        { "food_id": "mystery_greens", "food_name": "Greens", "category": "Legumes & Verduras",
                          "unit": "80 g", "calories": 20.2 }
                    ]
                }
            ]
        })
    }

    fn week_text() -> String {
        let days: Vec<_> = (0..7).rev().map(day).collect();
        json!({ "days": days }).to_string()
    }

    #[test]
    fn strips_markdown_fences() {
        let fenced = format!("```json\n{}\n```", week_text());
        let plan = parse_external_plan(&fenced).unwrap();
        assert_eq!(plan.days.len(), 7);
    }

    #[test]
    fn rejects_wrong_day_count() {
        let text = json!({ "days": [day(0)] }).to_string();
        assert!(matches!(parse_external_plan(&text), Err(AiError::MalformedExternalPlan(_))));
    }

    #[test]
    fn rejects_repeated_day_index() {
        let days: Vec<_> = (0..7).map(|i| day(i.min(5))).collect();
        let text = json!({ "days": days }).to_string();
        assert!(matches!(parse_external_plan(&text), Err(AiError::MalformedExternalPlan(_))));
    }

    #[test]
    fn rejects_unknown_meal_and_bad_time() {
        let mut bad = day(0);
        bad["meals"][0]["name"] = json!("Brunch");
        let days: Vec<_> = std::iter::once(bad).chain((1..7).map(day)).collect();
        assert!(parse_external_plan(&json!({ "days": days }).to_string()).is_err());

        let mut bad = day(0);
        bad["meals"][0]["time"] = json!("25:99");
        let days: Vec<_> = std::iter::once(bad).chain((1..7).map(day)).collect();
        assert!(parse_external_plan(&json!({ "days": days }).to_string()).is_err());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_external_plan("Sorry, I cannot help with that."),
            Err(AiError::MalformedExternalPlan(_))
        ));
    }

    #[test]
    fn converts_to_week_plan() {
        let plan = parse_external_plan(&week_text()).unwrap();
        let week = plan.into_week_plan(Catalog::builtin(), 1800).unwrap();

        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].day, DayLabel::Mon);
        assert_eq!(week.days[6].day, DayLabel::Sun);

        let monday = &week.days[0];
        assert_eq!(monday.total_calories, 1800);
        assert_eq!(monday.main_protein_id.as_deref(), Some("protein_chicken"));
        assert_eq!(monday.meals[0].slot, MealSlot::Lunch);
        assert_eq!(monday.meals[1].slot, MealSlot::Dinner);

        let lunch = monday.meal(MealSlot::Lunch).unwrap();
        assert_eq!(lunch.calories, 268);
        assert_eq!(lunch.items[0].portion, "150 g");
        assert_eq!(lunch.items[1].category, Category::Vegetable);
    }
}
