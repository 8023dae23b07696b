use serde_json::json;

use crate::catalog::Catalog;
use crate::plan::SlotPolicy;

const PORTION_RULES: &str = "\
- Eggs: always 2 units (never grams)
- Fruits: 1 unit (never grams)
- Whole-grain bread: 2 slices
- Cheeses: 1 slice
- Toast: 3 units
- Beverages: millilitres
- Everything else: grams appropriate for the meal";

const RESPONSE_SHAPE: &str = r#"{
  "days": [
    {
      "day_name": "Monday",
      "day_index": 0,
      "meals": [
        {
          "name": "breakfast",
          "time": "08:20",
          "items": [
            {
              "food_id": "carb_wholegrain_bread",
              "food_name": "Whole-grain bread",
              "category": "carbohydrate",
              "unit": "2 slices",
              "quantity": 2,
              "quantity_g": 60,
              "calories": 148,
              "protein_g": 7.8,
              "carbs_g": 24.6,
              "fat_g": 2.5
            }
          ]
        }
      ]
    }
  ]
}"#;

/// Structured prompt for the alternate, model-driven week plan.
pub fn plan_prompt<S: AsRef<str>>(
    total_calories: u32,
    liked_ids: &[S],
    catalog: &Catalog,
    policy: &SlotPolicy,
) -> String {
    let table: Vec<_> = catalog
        .iter()
        .map(|f| {
            json!({
                "id": f.id,
                "name": f.name,
                "category": f.category,
                "calories_per_portion": f.calories_per_portion,
                "protein_g": f.protein_g,
                "carbs_g": f.carbs_g,
                "fat_g": f.fat_g,
                "typical_portion_g": f.typical_portion_g,
            })
        })
        .collect();
    let liked: Vec<&str> = liked_ids.iter().map(AsRef::as_ref).collect();

    let mut schedule = String::new();
    let mut shares = String::new();
    for spec in policy.specs() {
        schedule.push_str(&format!("- {}: {}\n", spec.slot.as_key(), spec.nominal_time));
        shares.push_str(&format!("- {}: {}%\n", spec.slot.as_key(), (spec.share * 100.0).round()));
    }

    format!(
        "You are a nutritionist planning meals around animal protein and practicality.\n\
         Answer with valid JSON only, no markdown and no extra text.\n\n\
         AVAILABLE FOODS:\n{table}\n\n\
         USER LIKED FOODS: {liked}\n\n\
         PORTION UNITS:\n{PORTION_RULES}\n\n\
         TASK:\nBuild a 7-day plan with {total_calories} kcal per day.\n\n\
         FIXED TIMES:\n{schedule}\n\
         CALORIE SHARES:\n{shares}\n\
         GUIDELINES:\n\
         1. Lunch and dinner always include one animal protein\n\
         2. Breakfast: carbohydrate + fruit + beverage\n\
         3. Snacks are light (fruit + yogurt, or oats + fruit)\n\
         4. Vary proteins between consecutive days\n\
         5. Prefer the user's liked foods\n\
         6. Compute nutrition from the quantities used\n\n\
         RESPONSE FORMAT:\n{RESPONSE_SHAPE}\n\n\
         Return ONLY the JSON.",
        table = serde_json::Value::Array(table),
        liked = serde_json::Value::from(liked),
    )
}

/// Free-text tips prompt, optionally focused on a user question.
pub fn tips_prompt(daily_calorie_target: Option<u32>, question: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a friendly nutritionist. Give three short, practical tips for \
         following a meal plan built around animal protein, whole carbohydrates and vegetables.",
    );
    if let Some(target) = daily_calorie_target {
        prompt.push_str(&format!(" The user's daily target is {} kcal.", target));
    }
    if let Some(q) = question.map(str::trim).filter(|q| !q.is_empty()) {
        prompt.push_str(&format!("\nThe user asks: {}", q));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_prompt_carries_inputs() {
        let prompt = plan_prompt(1800, &["protein_chicken"], Catalog::builtin(), &SlotPolicy::default());
        assert!(prompt.contains("1800 kcal"));
        assert!(prompt.contains("\"protein_chicken\""));
        assert!(prompt.contains("carb_tapioca"));
        assert!(prompt.contains("lunch: 12:30"));
        assert!(prompt.contains("lunch: 30%"));
        assert!(prompt.contains("- lunch: 12:30\n- afternoon_snack"));
        assert!(prompt.contains("\"day_index\""));
    }

    #[test]
    fn tips_prompt_ignores_blank_question() {
        let prompt = tips_prompt(Some(2000), Some("   "));
        assert!(prompt.contains("2000 kcal"));
        assert!(!prompt.contains("The user asks"));

        let prompt = tips_prompt(None, Some("What about coffee?"));
        assert!(prompt.ends_with("The user asks: What about coffee?"));
    }
}
