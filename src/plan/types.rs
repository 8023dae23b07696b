use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::Time;

use crate::catalog::{Catalog, Category, FoodEntry};
use crate::plan::portion::portion_label;

/// Meal occasions in canonical order. Identity is semantic; `label` is only
/// for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 6] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
        MealSlot::EveningSnack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon snack",
            MealSlot::Dinner => "Dinner",
            MealSlot::EveningSnack => "Evening snack",
        }
    }

    /// Serialized key, e.g. `morning_snack`.
    pub fn as_key(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning_snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon_snack",
            MealSlot::Dinner => "dinner",
            MealSlot::EveningSnack => "evening_snack",
        }
    }

    /// Resolves meal names coming back from the text service, which may use
    /// the semantic key, the English label or the Portuguese originals.
    pub fn from_external_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        let slot = match normalized.as_str() {
            "breakfast" | "café" | "cafe" | "café da manhã" => MealSlot::Breakfast,
            "morning_snack" | "morning snack" | "colação" | "colacao" | "lanche manhã" => {
                MealSlot::MorningSnack
            }
            "lunch" | "almoço" | "almoco" => MealSlot::Lunch,
            "afternoon_snack" | "afternoon snack" | "lanche" | "lanche tarde" => {
                MealSlot::AfternoonSnack
            }
            "dinner" | "jantar" => MealSlot::Dinner,
            "evening_snack" | "evening snack" | "ceia" => MealSlot::EveningSnack,
            _ => return None,
        };
        Some(slot)
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabel {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayLabel {
    pub const WEEK: [DayLabel; 7] = [
        DayLabel::Mon,
        DayLabel::Tue,
        DayLabel::Wed,
        DayLabel::Thu,
        DayLabel::Fri,
        DayLabel::Sat,
        DayLabel::Sun,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::WEEK.get(index).copied()
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayLabel::Sat | DayLabel::Sun)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayLabel::Mon => "mon",
            DayLabel::Tue => "tue",
            DayLabel::Wed => "wed",
            DayLabel::Thu => "thu",
            DayLabel::Fri => "fri",
            DayLabel::Sat => "sat",
            DayLabel::Sun => "sun",
        }
    }
}

impl FromStr for DayLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayLabel::WEEK
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown day label `{}`", s))
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock meal time, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MealTime(Time);

impl MealTime {
    pub const fn new(time: Time) -> Self {
        Self(time)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        let (h, m) = (minutes / 60, minutes % 60);
        Time::from_hms(h as u8, m as u8, 0).ok().map(Self)
    }

    pub fn minutes(self) -> u16 {
        self.0.hour() as u16 * 60 + self.0.minute() as u16
    }

    pub fn time(self) -> Time {
        self.0
    }
}

impl FromStr for MealTime {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Time::parse(s.trim(), format_description!("[hour]:[minute]")).map(Self)
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl Serialize for MealTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MealTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub food_id: String,
    pub name: String,
    pub category: Category,
    pub portion: String,
}

impl MealItem {
    pub fn from_entry(entry: &FoodEntry) -> Self {
        Self {
            food_id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category,
            portion: portion_label(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub slot: MealSlot,
    pub time: MealTime,
    pub items: Vec<MealItem>,
    /// Display estimate from the slot share; never reconciled with item macros.
    pub calories: u32,
}

impl Meal {
    /// Order-insensitive identity of the item set.
    pub fn signature(&self) -> Vec<String> {
        item_signature(self.items.iter().map(|i| i.food_id.as_str()))
    }

    pub fn macros(&self, catalog: &Catalog) -> MacroTotals {
        self.items
            .iter()
            .filter_map(|i| catalog.get(&i.food_id))
            .fold(MacroTotals::default(), |acc, f| acc + MacroTotals::of(f))
    }
}

pub(crate) fn item_signature<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut sig: Vec<String> = ids.into_iter().map(str::to_string).collect();
    sig.sort();
    sig
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: DayLabel,
    pub meals: Vec<Meal>,
    pub total_calories: u32,
    pub main_protein_id: Option<String>,
}

impl DayPlan {
    pub fn meal(&self, slot: MealSlot) -> Option<&Meal> {
        self.meals.iter().find(|m| m.slot == slot)
    }

    pub fn meal_mut(&mut self, slot: MealSlot) -> Option<&mut Meal> {
        self.meals.iter_mut().find(|m| m.slot == slot)
    }

    pub fn macros(&self, catalog: &Catalog) -> MacroTotals {
        self.meals
            .iter()
            .fold(MacroTotals::default(), |acc, m| acc + m.macros(catalog))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: Vec<DayPlan>,
}

impl WeekPlan {
    pub fn day(&self, label: DayLabel) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == label)
    }

    pub fn day_mut(&mut self, label: DayLabel) -> Option<&mut DayPlan> {
        self.days.iter_mut().find(|d| d.day == label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    pub fn of(entry: &FoodEntry) -> Self {
        Self {
            calories: entry.calories_per_portion,
            protein_g: entry.protein_g,
            carbs_g: entry.carbs_g,
            fat_g: entry.fat_g,
        }
    }
}

impl std::ops::Add for MacroTotals {
    type Output = MacroTotals;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            calories: self.calories + rhs.calories,
            protein_g: self.protein_g + rhs.protein_g,
            carbs_g: self.carbs_g + rhs.carbs_g,
            fat_g: self.fat_g + rhs.fat_g,
        }
    }
}
