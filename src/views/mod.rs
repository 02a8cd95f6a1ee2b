pub mod controller;
pub mod types;

pub use controller::{SwitchOutcome, ViewController};
pub use types::*;
