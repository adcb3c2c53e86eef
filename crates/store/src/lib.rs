pub mod json_store;
pub mod dashboard;

pub use json_store::{JsonStore, DEFAULT_STORE_PATH};
pub use dashboard::{build_dashboard, DashboardData};
