//! Meal-plan service: rule-based weekly plan generation over a static food
//! catalog, with an optional model-driven path and an axum HTTP surface.

pub mod ai;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod meals;
pub mod plan;
pub mod preferences;
pub mod state;
