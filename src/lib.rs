pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::MealStretchService;
pub use config::AppConfig;
pub use crate::core::catalog::Catalog;
pub use crate::core::selector::{select_meals, Selection, SelectionStrategy};
pub use domain::model::{MealPlan, PlanRequest, RegionTag, Store};
pub use utils::error::{AppError, Result, SelectionError};
