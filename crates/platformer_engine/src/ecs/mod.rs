//! Entity-Component-System implementation
//!
//! A small sparse-set store: one generational entity allocator, one
//! component map per component kind, typed queries and per-kind lifecycle
//! hooks.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod query;
pub mod components;

pub use world::{Hook, World};
pub use entity::Entity;
pub use component::Component;
pub use storage::ComponentStorage;
pub use query::{Query, QueryParam};
pub use components::{AudioPlayer, BodyKind, Collider, ColliderShape, Sprite, Transform};
