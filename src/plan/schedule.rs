//! Schedule-aware time shifting layered over the nominal slot times.

use std::collections::HashMap;

use serde::Serialize;
use time::macros::time;

use crate::plan::types::{DayLabel, MealSlot, MealTime};

pub trait TimeShift: Send + Sync {
    fn shift(&self, day: DayLabel, slot: MealSlot, nominal: MealTime) -> MealTime;
}

/// Leaves every slot at its nominal time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NominalTimes;

impl TimeShift for NominalTimes {
    fn shift(&self, _day: DayLabel, _slot: MealSlot, nominal: MealTime) -> MealTime {
        nominal
    }
}

const NOON: MealTime = MealTime::new(time!(12:00));
const LUNCH_DEADLINE_MIN: u16 = 11 * 60 + 59;
const EARLIEST_LUNCH_MIN: u16 = 10 * 60 + 30;
const LUNCH_DURATION_MIN: u16 = 45;

/// Moves lunch before the commute on days whose work starts at noon or later.
#[derive(Debug, Clone, Default)]
pub struct WorkSchedule {
    pub work_start_by_day: HashMap<DayLabel, MealTime>,
    pub commute_minutes: u16,
}

impl WorkSchedule {
    pub fn weekdays(start: MealTime, commute_minutes: u16) -> Self {
        let work_start_by_day = DayLabel::WEEK
            .into_iter()
            .filter(|d| !d.is_weekend())
            .map(|d| (d, start))
            .collect();
        Self {
            work_start_by_day,
            commute_minutes,
        }
    }

    fn early_lunch(&self) -> MealTime {
        let start = LUNCH_DEADLINE_MIN
            .saturating_sub(self.commute_minutes)
            .saturating_sub(LUNCH_DURATION_MIN)
            .max(EARLIEST_LUNCH_MIN);
        MealTime::from_minutes(start).unwrap_or(NOON)
    }
}

impl TimeShift for WorkSchedule {
    fn shift(&self, day: DayLabel, slot: MealSlot, nominal: MealTime) -> MealTime {
        match (slot, self.work_start_by_day.get(&day)) {
            (MealSlot::Lunch, Some(start)) if *start >= NOON => self.early_lunch(),
            _ => nominal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: MealTime,
    pub end: MealTime,
}

/// Fixed weekly time windows; a slot without a window keeps its nominal time.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub windows: Vec<(MealSlot, TimeWindow)>,
}

fn window(start: time::Time, end: time::Time) -> TimeWindow {
    TimeWindow {
        start: MealTime::new(start),
        end: MealTime::new(end),
    }
}

impl ScheduleTemplate {
    pub fn builtin(id: &str) -> Option<Self> {
        use MealSlot::*;
        let (id, name, windows) = match id.trim().to_ascii_uppercase().as_str() {
            "A" => (
                "A",
                "Short office hours (08:00-17:00)",
                vec![
                    (Breakfast, window(time!(6:30), time!(7:30))),
                    (MorningSnack, window(time!(9:30), time!(10:30))),
                    (Lunch, window(time!(12:00), time!(13:30))),
                    (AfternoonSnack, window(time!(15:30), time!(16:30))),
                    (Dinner, window(time!(18:30), time!(19:30))),
                    (EveningSnack, window(time!(21:00), time!(22:00))),
                ],
            ),
            "B" => (
                "B",
                "Long office hours (08:00-21:00)",
                vec![
                    (Breakfast, window(time!(6:00), time!(6:45))),
                    (MorningSnack, window(time!(9:30), time!(10:15))),
                    (Lunch, window(time!(12:30), time!(13:15))),
                    (AfternoonSnack, window(time!(16:30), time!(17:15))),
                    (Dinner, window(time!(21:15), time!(22:00))),
                    (EveningSnack, window(time!(23:00), time!(23:30))),
                ],
            ),
            "C" => (
                "C",
                "Early day shift (06:00-14:00)",
                vec![
                    (Breakfast, window(time!(5:00), time!(5:30))),
                    (MorningSnack, window(time!(8:30), time!(9:00))),
                    (Lunch, window(time!(11:30), time!(12:30))),
                    (AfternoonSnack, window(time!(14:30), time!(15:00))),
                    (Dinner, window(time!(18:30), time!(19:30))),
                ],
            ),
            "D" => (
                "D",
                "Afternoon shift (12:00-21:00)",
                vec![
                    (Breakfast, window(time!(8:00), time!(9:00))),
                    (MorningSnack, window(time!(11:00), time!(11:45))),
                    (Lunch, window(time!(11:30), time!(12:00))),
                    (AfternoonSnack, window(time!(15:00), time!(15:45))),
                    (Dinner, window(time!(21:15), time!(22:00))),
                    (EveningSnack, window(time!(23:00), time!(23:30))),
                ],
            ),
            "E" => (
                "E",
                "Weekends and days off",
                vec![
                    (Breakfast, window(time!(8:00), time!(9:30))),
                    (MorningSnack, window(time!(10:30), time!(11:30))),
                    (Lunch, window(time!(12:30), time!(14:00))),
                    (AfternoonSnack, window(time!(16:00), time!(17:30))),
                    (Dinner, window(time!(19:00), time!(21:00))),
                ],
            ),
            _ => return None,
        };
        Some(Self { id, name, windows })
    }

    pub fn window_for(&self, slot: MealSlot) -> Option<&TimeWindow> {
        self.windows.iter().find(|(s, _)| *s == slot).map(|(_, w)| w)
    }
}

impl TimeShift for ScheduleTemplate {
    fn shift(&self, _day: DayLabel, slot: MealSlot, nominal: MealTime) -> MealTime {
        self.window_for(slot).map(|w| w.start).unwrap_or(nominal)
    }
}
