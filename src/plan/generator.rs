//! Rule-based day generator.

use serde::Deserialize;
use tracing::debug;

use crate::catalog::{Catalog, Category, FoodEntry};
use crate::plan::policy::{is_breakfast_beverage, CarbRule, SlotPolicy, OATS_ID, TEA_ID, TOAST_ID, YOGURT_ID};
use crate::plan::pool::{select_pool, Pool, DEFAULT_LIKED_THRESHOLD};
use crate::plan::random::{choose_many, coin, pick, RandomSource};
use crate::plan::schedule::TimeShift;
use crate::plan::types::{DayLabel, DayPlan, Meal, MealItem, MealSlot};

const SIDE_VEGETABLES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlannerOptions {
    pub liked_threshold: usize,
    pub regeneration_attempts: usize,
    pub max_alternatives: usize,
    pub swap_limit: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            liked_threshold: DEFAULT_LIKED_THRESHOLD,
            regeneration_attempts: 12,
            max_alternatives: 3,
            swap_limit: 3,
        }
    }
}

/// Catalog, slot policy and optional schedule shift bundled for generation.
/// Holds no mutable state; randomness is passed per call.
#[derive(Clone)]
pub struct Planner<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) policy: SlotPolicy,
    pub(crate) options: PlannerOptions,
    pub(crate) schedule: Option<&'a dyn TimeShift>,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            policy: SlotPolicy::default(),
            options: PlannerOptions::default(),
            schedule: None,
        }
    }

    pub fn with_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_schedule(mut self, schedule: &'a dyn TimeShift) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn pool<S: AsRef<str>>(&self, liked_ids: &[S]) -> Pool<'a> {
        select_pool(self.catalog, liked_ids, self.options.liked_threshold)
    }

    /// One meal per policy slot, sorted by time. Slots whose categories have
    /// no candidates come back with fewer items, never an error.
    pub fn generate_day<S, R>(
        &self,
        total_calories: u32,
        liked_ids: &[S],
        day: DayLabel,
        avoid_protein_id: Option<&str>,
        rng: &mut R,
    ) -> DayPlan
    where
        S: AsRef<str>,
        R: RandomSource + ?Sized,
    {
        let pool = self.pool(liked_ids);
        let composition = self.compose(&pool, avoid_protein_id, rng);

        let mut meals: Vec<Meal> = self
            .policy
            .specs()
            .iter()
            .map(|spec| {
                let time = match self.schedule {
                    Some(schedule) => schedule.shift(day, spec.slot, spec.nominal_time),
                    None => spec.nominal_time,
                };
                Meal {
                    slot: spec.slot,
                    time,
                    items: composition
                        .items(spec.slot)
                        .iter()
                        .map(|f| MealItem::from_entry(f))
                        .collect(),
                    calories: self.policy.calories_for(spec.slot, total_calories),
                }
            })
            .collect();
        meals.sort_by_key(|m| m.time);

        let main_protein_id = composition.protein.map(|p| p.id.clone());
        debug!(
            %day,
            pool = pool.len(),
            protein = ?main_protein_id,
            avoided = ?avoid_protein_id,
            "day generated"
        );

        DayPlan {
            day,
            meals,
            total_calories,
            main_protein_id,
        }
    }

    fn compose<R: RandomSource + ?Sized>(
        &self,
        pool: &Pool<'a>,
        avoid_protein_id: Option<&str>,
        rng: &mut R,
    ) -> Composition<'a> {
        let fruits = pool.by_category(Category::Fruit);
        let dairy = pool.by_category(Category::Dairy);
        let vegetables = pool.by_category(Category::Vegetable);
        let fallback = |id: &str| pool.get(id).or_else(|| self.catalog.get(id));

        let breakfast_carbs = pool.filter(|f| CarbRule::Breakfast.allows(f));
        // drinks ignore the pool: every breakfast beverage stays on the menu
        let breakfast_drinks: Vec<&FoodEntry> = self
            .catalog
            .iter()
            .filter(|f| is_breakfast_beverage(f))
            .collect();
        let breakfast = vec![
            pick(&breakfast_carbs, rng).copied(),
            pick(&fruits, rng).copied(),
            pick(&breakfast_drinks, rng).copied(),
        ];

        // fruit and yogurt are shared by the light slots of the day
        let fruit = pick(&fruits, rng).copied();
        let yogurt = pool.get(YOGURT_ID).or_else(|| pick(&dairy, rng).copied());
        let toast = fallback(TOAST_ID);
        let morning_snack = vec![fruit, if coin(rng) { yogurt } else { toast }];

        let protein = choose_protein(pool, avoid_protein_id, rng);
        let lunch_carbs = pool.filter(|f| CarbRule::Lunch.allows(f));
        let mut lunch = vec![protein, pick(&lunch_carbs, rng).copied()];
        lunch.extend(choose_many(&vegetables, SIDE_VEGETABLES, rng).into_iter().map(Some));

        let oats = fallback(OATS_ID);
        let afternoon_snack = vec![if coin(rng) { yogurt.or(oats) } else { oats }, fruit];

        // same protein as lunch: one cooking effort per day
        let dinner_carbs = pool.filter(|f| CarbRule::LightDinner.allows(f));
        let mut dinner = vec![protein, pick(&dinner_carbs, rng).copied()];
        dinner.extend(choose_many(&vegetables, SIDE_VEGETABLES, rng).into_iter().map(Some));

        let evening_options: Vec<&FoodEntry> = [yogurt, fruit, fallback(TEA_ID)].into_iter().flatten().collect();
        let evening_snack = vec![pick(&evening_options, rng).copied()];

        Composition {
            protein,
            breakfast: flatten(breakfast),
            morning_snack: flatten(morning_snack),
            lunch: flatten(lunch),
            afternoon_snack: flatten(afternoon_snack),
            dinner: flatten(dinner),
            evening_snack: flatten(evening_snack),
        }
    }
}

/// Random protein other than `avoid`; the first protein in the pool when the
/// exclusion leaves nothing.
fn choose_protein<'a, R: RandomSource + ?Sized>(
    pool: &Pool<'a>,
    avoid: Option<&str>,
    rng: &mut R,
) -> Option<&'a FoodEntry> {
    let proteins = pool.by_category(Category::AnimalProtein);
    let allowed: Vec<&FoodEntry> = proteins
        .iter()
        .copied()
        .filter(|p| Some(p.id.as_str()) != avoid)
        .collect();
    pick(&allowed, rng).copied().or_else(|| proteins.first().copied())
}

fn flatten<'a>(items: Vec<Option<&'a FoodEntry>>) -> Vec<&'a FoodEntry> {
    items.into_iter().flatten().collect()
}

struct Composition<'a> {
    protein: Option<&'a FoodEntry>,
    breakfast: Vec<&'a FoodEntry>,
    morning_snack: Vec<&'a FoodEntry>,
    lunch: Vec<&'a FoodEntry>,
    afternoon_snack: Vec<&'a FoodEntry>,
    dinner: Vec<&'a FoodEntry>,
    evening_snack: Vec<&'a FoodEntry>,
}

impl<'a> Composition<'a> {
    fn items(&self, slot: MealSlot) -> &[&'a FoodEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::MorningSnack => &self.morning_snack,
            MealSlot::Lunch => &self.lunch,
            MealSlot::AfternoonSnack => &self.afternoon_snack,
            MealSlot::Dinner => &self.dinner,
            MealSlot::EveningSnack => &self.evening_snack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_food;
    use crate::plan::random::{SeededRandom, SequenceRandom};
    use crate::plan::policy::BREAKFAST_BEVERAGES;
    use crate::plan::schedule::WorkSchedule;

    const NO_LIKES: [&str; 0] = [];

    fn protein_catalog() -> Catalog {
        Catalog::from_entries(vec![
            test_food("chicken", Category::AnimalProtein, true),
            test_food("beef", Category::AnimalProtein, true),
            test_food("pork", Category::AnimalProtein, true),
            test_food("eggs", Category::AnimalProtein, true),
        ])
        .unwrap()
    }

    #[test]
    fn one_meal_per_slot_sorted_by_time() {
        let planner = Planner::new(Catalog::builtin());
        let mut rng = SeededRandom::new(1);
        for seed_day in DayLabel::WEEK {
            let day = planner.generate_day(2000, &NO_LIKES, seed_day, None, &mut rng);
            assert_eq!(day.meals.len(), MealSlot::ALL.len());
            for slot in MealSlot::ALL {
                assert_eq!(day.meals.iter().filter(|m| m.slot == slot).count(), 1);
            }
            assert!(day.meals.windows(2).all(|w| w[0].time <= w[1].time));
            assert_eq!(day.day, seed_day);
            assert_eq!(day.total_calories, 2000);
        }
    }

    #[test]
    fn meal_calories_follow_slot_shares() {
        let planner = Planner::new(Catalog::builtin());
        let day = planner.generate_day(1800, &NO_LIKES, DayLabel::Mon, None, &mut SeededRandom::new(3));
        assert_eq!(day.meal(MealSlot::Lunch).unwrap().calories, 540);

        let policy = SlotPolicy::default();
        let expected: u32 = MealSlot::ALL.iter().map(|s| policy.calories_for(*s, 1800)).sum();
        let actual: u32 = day.meals.iter().map(|m| m.calories).sum();
        assert_eq!(actual, expected);
    }

    #[test]
    fn avoided_protein_is_never_chosen() {
        let catalog = protein_catalog();
        let planner = Planner::new(&catalog);
        let mut rng = SeededRandom::new(99);
        for _ in 0..100 {
            let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Wed, Some("chicken"), &mut rng);
            let protein = day.main_protein_id.unwrap();
            assert!(["beef", "pork", "eggs"].contains(&protein.as_str()));
        }
    }

    #[test]
    fn avoid_hint_is_ignored_when_it_empties_the_set() {
        let catalog = Catalog::from_entries(vec![test_food("chicken", Category::AnimalProtein, true)]).unwrap();
        let planner = Planner::new(&catalog);
        let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Mon, Some("chicken"), &mut SequenceRandom::zeros());
        assert_eq!(day.main_protein_id.as_deref(), Some("chicken"));
    }

    #[test]
    fn lunch_protein_is_reused_at_dinner() {
        let planner = Planner::new(Catalog::builtin());
        let mut rng = SeededRandom::new(5);
        for _ in 0..20 {
            let day = planner.generate_day(2200, &NO_LIKES, DayLabel::Fri, None, &mut rng);
            let protein_of = |slot| {
                day.meal(slot)
                    .unwrap()
                    .items
                    .iter()
                    .find(|i| i.category == Category::AnimalProtein)
                    .map(|i| i.food_id.clone())
            };
            assert_eq!(protein_of(MealSlot::Lunch), day.main_protein_id);
            assert_eq!(protein_of(MealSlot::Dinner), day.main_protein_id);
        }
    }

    #[test]
    fn lunch_and_dinner_have_two_distinct_vegetables() {
        let planner = Planner::new(Catalog::builtin());
        let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Thu, None, &mut SeededRandom::new(11));
        for slot in [MealSlot::Lunch, MealSlot::Dinner] {
            let vegs: Vec<_> = day
                .meal(slot)
                .unwrap()
                .items
                .iter()
                .filter(|i| i.category == Category::Vegetable)
                .map(|i| i.food_id.clone())
                .collect();
            assert_eq!(vegs.len(), 2);
            assert_ne!(vegs[0], vegs[1]);
        }
    }

    #[test]
    fn dinner_carb_comes_from_the_light_subset() {
        let planner = Planner::new(Catalog::builtin());
        let mut rng = SeededRandom::new(21);
        for _ in 0..30 {
            let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Sun, None, &mut rng);
            for item in &day.meal(MealSlot::Dinner).unwrap().items {
                if item.category == Category::Carbohydrate {
                    assert!(crate::plan::policy::LIGHT_DINNER_CARBS.contains(&item.food_id.as_str()));
                }
            }
        }
    }

    #[test]
    fn empty_catalog_yields_empty_meals_without_panicking() {
        let catalog = Catalog::empty();
        let planner = Planner::new(&catalog);
        let day = planner.generate_day(1500, &["x"], DayLabel::Mon, Some("y"), &mut SeededRandom::new(0));
        assert_eq!(day.meals.len(), 6);
        assert!(day.meals.iter().all(|m| m.items.is_empty()));
        assert!(day.main_protein_id.is_none());
    }

    #[test]
    fn light_slots_fall_back_to_fixed_foods() {
        // only proteins liked and affordable: light slots lean on catalog fallbacks
        let planner = Planner::new(Catalog::builtin());
        let liked = [
            "protein_chicken",
            "protein_beef",
            "protein_pork",
            "protein_tilapia",
            "protein_salmon",
            "protein_sardine",
        ];
        let day = planner.generate_day(2000, &liked, DayLabel::Mon, None, &mut SequenceRandom::new(vec![0.9]));
        let afternoon = day.meal(MealSlot::AfternoonSnack).unwrap();
        assert_eq!(afternoon.items.len(), 1);
        assert_eq!(afternoon.items[0].food_id, OATS_ID);
        let morning = day.meal(MealSlot::MorningSnack).unwrap();
        assert_eq!(morning.items[0].food_id, TOAST_ID);
        let evening = day.meal(MealSlot::EveningSnack).unwrap();
        assert_eq!(evening.items[0].food_id, TEA_ID);
    }

    #[test]
    fn breakfast_beverage_is_not_limited_to_liked_drinks() {
        let planner = Planner::new(Catalog::builtin());
        let liked = [
            "protein_chicken",
            "carb_oats",
            "fruit_banana",
            "veg_broccoli",
            "veg_carrot",
            "dairy_yogurt",
            "bev_coffee",
        ];
        assert_eq!(planner.pool(&liked).len(), liked.len());

        let mut rng = SeededRandom::new(42);
        let mut drinks = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let day = planner.generate_day(2000, &liked, DayLabel::Mon, None, &mut rng);
            let breakfast = day.meal(MealSlot::Breakfast).unwrap();
            drinks.extend(
                breakfast
                    .items
                    .iter()
                    .filter(|i| i.category == Category::Beverage)
                    .map(|i| i.food_id.clone()),
            );
        }
        assert!(drinks.len() > 1, "only {:?} ever served", drinks);
        assert!(drinks.iter().all(|id| BREAKFAST_BEVERAGES.contains(&id.as_str())));
    }

    #[test]
    fn schedule_shift_reorders_meals() {
        let schedule = WorkSchedule::weekdays("13:00".parse().unwrap(), 30);
        let planner = Planner::new(Catalog::builtin()).with_schedule(&schedule);
        let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Mon, None, &mut SeededRandom::new(8));
        let lunch = day.meal(MealSlot::Lunch).unwrap();
        assert_eq!(lunch.time.to_string(), "10:44");
        assert!(day.meals.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn items_carry_portion_labels() {
        let planner = Planner::new(Catalog::builtin());
        let day = planner.generate_day(2000, &NO_LIKES, DayLabel::Mon, None, &mut SeededRandom::new(2));
        for meal in &day.meals {
            for item in &meal.items {
                let entry = Catalog::builtin().get(&item.food_id).unwrap();
                assert_eq!(item.portion, crate::plan::portion::portion_label(entry));
            }
        }
    }
}
