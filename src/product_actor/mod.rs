//! Product records kept by a [`ResourceActor`](crate::actor_framework::ResourceActor).

mod entity;
