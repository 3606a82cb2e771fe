//! Cloneable handles for talking to running services.

#[macro_use]
mod macros;
mod form_client;

pub use form_client::*;
