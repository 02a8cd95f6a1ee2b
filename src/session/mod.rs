pub mod gate;
pub mod store;

pub use gate::{GateDecision, SessionGate};
#[cfg(feature = "sqlite-session")]
pub use store::SqliteSessionStore;
pub use store::{InMemorySessionStore, SessionStore};
