pub mod client;
pub mod types;

pub use client::{DashboardApi, HttpDashboardApi};
pub use types::*;
