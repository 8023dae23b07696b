use tracing::debug;

use crate::plan::generator::Planner;
use crate::plan::random::RandomSource;
use crate::plan::types::{DayLabel, WeekPlan};

impl<'a> Planner<'a> {
    /// Seven days in fixed order. Each day avoids the previous day's main
    /// protein; a day without protein keeps the older hint alive.
    pub fn generate_week<S, R>(&self, total_calories: u32, liked_ids: &[S], rng: &mut R) -> WeekPlan
    where
        S: AsRef<str>,
        R: RandomSource + ?Sized,
    {
        let mut last_protein: Option<String> = None;
        let days = DayLabel::WEEK
            .into_iter()
            .map(|day| {
                let plan = self.generate_day(total_calories, liked_ids, day, last_protein.as_deref(), rng);
                if plan.main_protein_id.is_some() {
                    last_protein = plan.main_protein_id.clone();
                }
                plan
            })
            .collect();
        debug!(total_calories, liked = liked_ids.len(), "week generated");
        WeekPlan { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{test_food, Catalog, Category};
    use crate::plan::random::{SeededRandom, SequenceRandom};

    const NO_LIKES: [&str; 0] = [];

    #[test]
    fn seven_days_in_fixed_order() {
        let planner = Planner::new(Catalog::builtin());
        let week = planner.generate_week(1800, &NO_LIKES, &mut SeededRandom::new(4));
        let labels: Vec<DayLabel> = week.days.iter().map(|d| d.day).collect();
        assert_eq!(labels, DayLabel::WEEK.to_vec());
    }

    #[test]
    fn consecutive_days_rotate_protein() {
        let planner = Planner::new(Catalog::builtin());
        for seed in 0..25 {
            let week = planner.generate_week(2000, &NO_LIKES, &mut SeededRandom::new(seed));
            for pair in week.days.windows(2) {
                assert!(pair[1].main_protein_id.is_some());
                assert_ne!(pair[0].main_protein_id, pair[1].main_protein_id);
            }
        }
    }

    #[test]
    fn single_protein_repeats_when_nothing_else_exists() {
        let catalog = Catalog::from_entries(vec![
            test_food("only_fish", Category::AnimalProtein, true),
            test_food("rice", Category::Carbohydrate, true),
        ])
        .unwrap();
        let planner = Planner::new(&catalog);
        let week = planner.generate_week(2000, &NO_LIKES, &mut SequenceRandom::zeros());
        assert!(week
            .days
            .iter()
            .all(|d| d.main_protein_id.as_deref() == Some("only_fish")));
    }

    #[test]
    fn no_protein_days_are_allowed() {
        let catalog = Catalog::from_entries(vec![test_food("apple", Category::Fruit, true)]).unwrap();
        let planner = Planner::new(&catalog);
        let week = planner.generate_week(2000, &NO_LIKES, &mut SequenceRandom::zeros());
        assert_eq!(week.days.len(), 7);
        assert!(week.days.iter().all(|d| d.main_protein_id.is_none()));
    }
}
