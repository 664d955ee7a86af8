//! Per-kind component storage
//!
//! Each component type gets one [`ComponentStorage`], a sparse map from
//! entity to value. The world keeps them type-erased behind
//! [`ErasedStorage`] so despawning can sweep every kind an entity holds.

use std::any::Any;

use slotmap::SecondaryMap;

use super::{Component, Entity};

/// Sparse map from entity to one component value
pub struct ComponentStorage<T: Component> {
    components: SecondaryMap<Entity, T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            components: SecondaryMap::new(),
        }
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    /// Remove the value for `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(entity)
    }

    /// Get the value for `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(entity)
    }

    /// Get the value for `entity` mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(entity)
    }

    /// Whether `entity` has a value in this storage
    pub fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(entity)
    }

    /// Iterate over all (entity, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStorage`]
pub(crate) trait ErasedStorage {
    fn contains(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.components.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
