pub mod activity;
pub mod aggregator;
pub mod interested;
pub mod pitch_deck;
pub mod render;
pub mod state;

pub use aggregator::{DashboardAggregator, RefreshOutcome};
pub use render::render_dashboard;
