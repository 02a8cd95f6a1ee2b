//! Response payload -> view-model -> markup.
//!
//! The view-model step is pure and owns every optional-field and ordering
//! rule. Painters only decide how a view-model looks.

pub mod date;
pub mod html;
pub mod model;

pub use model::*;
