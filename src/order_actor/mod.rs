//! Order records kept by a [`ResourceActor`](crate::actor_framework::ResourceActor).

pub mod entity;

pub use entity::*;
