pub mod api;
pub mod config;
pub mod console;
pub mod dashboard;
#[cfg(feature = "sqlite-session")]
pub mod database;
pub mod error;
pub mod render;
pub mod session;
pub mod surface;
pub mod views;


pub use console::run;
pub use dashboard::{BootOutcome, Dashboard, DashboardDeps};
