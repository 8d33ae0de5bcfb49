pub mod catalog;
pub mod geo;
pub mod region;
pub mod selector;

pub use crate::domain::model::{MealPlan, MealTemplate, PlanRequest};
pub use crate::domain::ports::{Narrator, RegionResolver, StoreLocator};
pub use crate::utils::error::Result;
