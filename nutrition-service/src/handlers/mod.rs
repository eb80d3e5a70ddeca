//! HTTP handlers for the nutrition service.

pub mod analysis;
pub mod health;

pub use analysis::analyze_image;
pub use health::{health_check, metrics, readiness_check};
