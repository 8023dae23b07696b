use std::collections::HashSet;

use crate::catalog::{Catalog, Category, FoodEntry};

/// Liked foods needed before the pool stops mixing in affordable entries.
pub const DEFAULT_LIKED_THRESHOLD: usize = 6;

/// Candidate foods for one generation run, in catalog order.
#[derive(Debug, Clone)]
pub struct Pool<'a> {
    entries: Vec<&'a FoodEntry>,
}

impl<'a> Pool<'a> {
    pub fn entries(&self) -> &[&'a FoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&'a FoodEntry> {
        self.entries.iter().copied().find(|f| f.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&'a FoodEntry> {
        self.filter(|f| f.category == category)
    }

    pub fn filter(&self, pred: impl Fn(&FoodEntry) -> bool) -> Vec<&'a FoodEntry> {
        self.entries.iter().copied().filter(|f| pred(f)).collect()
    }

    pub fn ids(&self) -> HashSet<&'a str> {
        self.entries.iter().map(|f| f.id.as_str()).collect()
    }
}

/// Liked entries alone once at least `threshold` of them exist in the catalog,
/// otherwise liked ∪ affordable, deduplicated by id.
pub fn select_pool<'a, S: AsRef<str>>(catalog: &'a Catalog, liked_ids: &[S], threshold: usize) -> Pool<'a> {
    let liked_set: HashSet<&str> = liked_ids.iter().map(AsRef::as_ref).collect();
    let liked: Vec<&FoodEntry> = catalog
        .iter()
        .filter(|f| liked_set.contains(f.id.as_str()))
        .collect();

    if liked.len() >= threshold {
        return Pool { entries: liked };
    }

    let mut seen: HashSet<&str> = liked.iter().map(|f| f.id.as_str()).collect();
    let mut entries = liked;
    for food in catalog.iter().filter(|f| f.affordable) {
        if seen.insert(food.id.as_str()) {
            entries.push(food);
        }
    }
    Pool { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_food;

    fn catalog_with_ten_affordable() -> Catalog {
        let mut entries: Vec<FoodEntry> = (0..10)
            .map(|i| test_food(&format!("cheap_{}", i), Category::Vegetable, true))
            .collect();
        entries.push(test_food("pricey_a", Category::AnimalProtein, false));
        entries.push(test_food("pricey_b", Category::Fruit, false));
        Catalog::from_entries(entries).unwrap()
    }

    #[test]
    fn sparse_likes_union_with_affordable() {
        let catalog = catalog_with_ten_affordable();
        let pool = select_pool(&catalog, &["pricey_a", "cheap_3"], DEFAULT_LIKED_THRESHOLD);
        // 2 liked + 10 affordable, cheap_3 overlapping
        assert_eq!(pool.len(), 11);
        assert!(pool.contains("pricey_a"));
        assert!(!pool.contains("pricey_b"));
        assert_eq!(pool.ids().len(), pool.len());
    }

    #[test]
    fn enough_likes_use_liked_only() {
        let catalog = catalog_with_ten_affordable();
        let liked = ["cheap_0", "cheap_1", "cheap_2", "cheap_3", "pricey_a", "pricey_b"];
        let pool = select_pool(&catalog, &liked, DEFAULT_LIKED_THRESHOLD);
        let expected: HashSet<&str> = liked.into_iter().collect();
        assert_eq!(pool.ids(), expected);
    }

    #[test]
    fn unknown_liked_ids_do_not_count() {
        let catalog = catalog_with_ten_affordable();
        let liked = ["cheap_0", "ghost_1", "ghost_2", "ghost_3", "ghost_4", "pricey_a"];
        let pool = select_pool(&catalog, &liked, DEFAULT_LIKED_THRESHOLD);
        assert_eq!(pool.len(), 11);
    }

    #[test]
    fn empty_catalog_gives_empty_pool() {
        let catalog = Catalog::empty();
        let pool = select_pool(&catalog, &["anything"], DEFAULT_LIKED_THRESHOLD);
        assert!(pool.is_empty());
    }
}
