// Application layer: framework-independent service plus the axum HTTP adapter.

pub mod server;
pub mod service;
pub mod wire;

pub use service::{MealStretchService, PlanOutcome};
