use super::{Category, FoodEntry, PriceLabel};

use Category::*;
use PriceLabel::*;

#[allow(clippy::too_many_arguments)]
fn food(
    id: &str,
    category: Category,
    name: &str,
    kcal: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    portion: u32,
    price_label: PriceLabel,
    affordable: bool,
) -> FoodEntry {
    FoodEntry {
        id: id.to_string(),
        category,
        name: name.to_string(),
        calories_per_portion: kcal,
        protein_g,
        carbs_g,
        fat_g,
        typical_portion_g: portion,
        price_label,
        affordable,
        contains_lactose: false,
        contains_gluten: false,
    }
}

fn lactose(mut entry: FoodEntry) -> FoodEntry {
    entry.contains_lactose = true;
    entry
}

fn gluten(mut entry: FoodEntry) -> FoodEntry {
    entry.contains_gluten = true;
    entry
}

pub(super) fn builtin_entries() -> Vec<FoodEntry> {
    vec![
        // animal proteins
        food("protein_chicken", AnimalProtein, "Chicken breast", 165.0, 31.0, 0.0, 3.6, 100, Cheap, true),
        food("protein_beef", AnimalProtein, "Beef", 217.0, 26.0, 0.0, 12.0, 100, Medium, false),
        food("protein_pork", AnimalProtein, "Pork", 242.0, 27.0, 0.0, 14.0, 100, Medium, false),
        food("protein_tilapia", AnimalProtein, "Fish (tilapia)", 129.0, 26.0, 0.0, 2.7, 100, Cheap, true),
        food("protein_salmon", AnimalProtein, "Fish (salmon)", 208.0, 20.0, 0.0, 13.0, 100, Expensive, false),
        food("protein_eggs", AnimalProtein, "Eggs (boiled, scrambled or omelette)", 155.0, 13.0, 1.1, 11.0, 100, Cheap, true),
        food("protein_sardine", AnimalProtein, "Fish (sardine)", 208.0, 25.0, 0.0, 11.5, 100, Cheap, true),
        food("protein_liver", AnimalProtein, "Offal (liver)", 165.0, 26.0, 3.9, 4.8, 100, Cheap, true),
        // carbohydrates
        food("carb_brown_rice", Carbohydrate, "Brown rice", 111.0, 2.6, 23.0, 0.9, 100, Cheap, true),
        food("carb_white_rice", Carbohydrate, "White rice", 130.0, 2.4, 28.0, 0.3, 100, Cheap, true),
        gluten(food("carb_wholegrain_pasta", Carbohydrate, "Whole-grain pasta", 124.0, 5.0, 27.0, 0.9, 100, Medium, true)),
        food("carb_sweet_potato", Carbohydrate, "Sweet potato", 86.0, 1.6, 20.0, 0.1, 100, Cheap, true),
        food("carb_cassava", Carbohydrate, "Cassava", 125.0, 0.6, 30.0, 0.3, 100, Cheap, true),
        food("carb_quinoa", Carbohydrate, "Quinoa", 120.0, 4.4, 21.0, 1.9, 100, Expensive, false),
        food("carb_farofa", Carbohydrate, "Toasted cassava flour", 365.0, 1.2, 80.0, 3.0, 40, Cheap, true),
        food("carb_corn_couscous", Carbohydrate, "Corn couscous", 112.0, 3.8, 23.0, 0.6, 100, Cheap, true),
        food("carb_tapioca", Carbohydrate, "Tapioca crepe", 240.0, 0.0, 60.0, 0.0, 70, Cheap, true),
        gluten(food("carb_wholegrain_bread", Carbohydrate, "Whole-grain bread", 247.0, 13.0, 41.0, 4.2, 100, Medium, true)),
        gluten(food("carb_oats", Carbohydrate, "Rolled oats", 389.0, 17.0, 66.0, 7.0, 100, Cheap, true)),
        // legumes
        food("legume_beans", Legume, "Beans", 127.0, 9.0, 23.0, 0.5, 100, Cheap, true),
        food("legume_lentils", Legume, "Lentils", 116.0, 9.0, 20.0, 0.4, 100, Cheap, true),
        // vegetables
        food("veg_broccoli", Vegetable, "Broccoli", 35.0, 2.4, 7.0, 0.4, 100, Cheap, true),
        food("veg_carrot", Vegetable, "Carrot", 41.0, 0.9, 10.0, 0.2, 100, Cheap, true),
        food("veg_lettuce", Vegetable, "Lettuce", 15.0, 1.4, 2.9, 0.2, 100, Cheap, true),
        food("veg_tomato", Vegetable, "Tomato", 18.0, 0.9, 3.9, 0.2, 100, Cheap, true),
        food("veg_kale", Vegetable, "Kale", 49.0, 4.3, 8.8, 0.9, 100, Cheap, true),
        // fruits
        food("fruit_banana", Fruit, "Banana", 89.0, 1.1, 23.0, 0.3, 100, Cheap, true),
        food("fruit_apple", Fruit, "Apple", 52.0, 0.3, 14.0, 0.2, 100, Cheap, true),
        food("fruit_orange", Fruit, "Orange", 47.0, 0.9, 12.0, 0.1, 130, Cheap, true),
        food("fruit_grapes", Fruit, "Grapes", 69.0, 0.7, 18.0, 0.2, 100, Medium, false),
        // fats & condiments
        food("fat_olive_oil", FatOrCondiment, "Extra virgin olive oil", 119.0, 0.0, 0.0, 13.5, 14, Medium, true),
        food("fat_chia_seeds", FatOrCondiment, "Chia seeds", 486.0, 16.0, 42.0, 31.0, 100, Medium, true),
        // dairy
        lactose(food("dairy_milk", Dairy, "Milk", 61.0, 3.2, 4.8, 3.3, 100, Medium, true)),
        lactose(food("dairy_yogurt", Dairy, "Plain yogurt", 63.0, 5.3, 7.0, 1.7, 100, Medium, true)),
        lactose(food("dairy_white_cheese", Dairy, "White cheese", 264.0, 17.0, 3.2, 20.0, 30, Medium, true)),
        lactose(food("dairy_fresh_cheese", Dairy, "Fresh cheese", 240.0, 17.0, 3.0, 18.0, 30, Medium, false)),
        // snacks
        food("snack_popcorn", Snack, "Popcorn (air-popped)", 387.0, 13.0, 78.0, 4.5, 100, Cheap, true),
        food("snack_boiled_eggs", Snack, "Boiled eggs", 155.0, 13.0, 1.1, 11.0, 100, Cheap, true),
        gluten(food("snack_wholegrain_toast", Snack, "Whole-grain toast", 407.0, 11.0, 73.0, 7.0, 30, Cheap, true)),
        // beverages
        food("bev_water", Beverage, "Water", 0.0, 0.0, 0.0, 0.0, 250, Cheap, true),
        food("bev_coffee", Beverage, "Coffee, unsweetened", 2.0, 0.3, 0.0, 0.0, 200, Cheap, true),
        food("bev_natural_juice", Beverage, "Fresh fruit juice", 45.0, 0.7, 10.4, 0.2, 200, Medium, true),
        food("bev_tea", Beverage, "Herbal tea", 2.0, 0.0, 0.4, 0.0, 200, Cheap, true),
    ]
}
