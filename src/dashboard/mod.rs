//! Student dashboard
//!
//! Aggregation of courses, progress, notifications and certificates into one view,
//! plus the actions that change them.

pub mod aggregator;
pub mod renderer;
pub mod state;
pub mod updaters;
pub mod utils;
pub mod views;

pub use aggregator::{DashboardAggregator, DashboardConfig};
pub use renderer::{render_dashboard, render_json};
