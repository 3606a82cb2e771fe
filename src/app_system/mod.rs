//! System orchestration, startup, and shutdown logic.
//!
//! - [`DeskSystem`] wires a backend to the list views and spawns form sessions
//! - [`setup_tracing`] initializes logging once per process

pub mod desk_system;
pub mod tracing;

pub use desk_system::*;
pub use tracing::*;
