//! ECS World implementation

use super::query::{Query, QueryParam};
use super::storage::{ComponentStorage, ErasedStorage};
use super::{Component, Entity};
use slotmap::SlotMap;
use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

/// Lifecycle hook fired when a component kind is attached to or detached
/// from an entity
///
/// Hooks receive a shared world: they may read and write components and
/// resources through the runtime-checked accessors, but cannot spawn or
/// despawn.
pub type Hook = fn(&World, Entity);

#[derive(Default)]
struct ComponentHooks {
    on_attach: Vec<Hook>,
    on_detach: Vec<Hook>,
}

/// ECS World containing all entities, components and resources
pub struct World {
    entities: SlotMap<Entity, ()>,
    storages: HashMap<TypeId, RefCell<Box<dyn ErasedStorage>>>,
    hooks: HashMap<TypeId, ComponentHooks>,
    resources: HashMap<TypeId, RefCell<Box<dyn Any>>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            storages: HashMap::new(),
            hooks: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn spawn(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity and all of its components
    ///
    /// Every detach hook for every kind the entity holds runs first, while
    /// all of its components are still readable; only then are the values
    /// dropped. Returns `false` if the entity was not alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.contains_key(entity) {
            return false;
        }

        let held: Vec<TypeId> = self
            .storages
            .iter()
            .filter(|(_, storage)| storage.borrow().contains(entity))
            .map(|(type_id, _)| *type_id)
            .collect();

        for type_id in &held {
            self.fire_detach(*type_id, entity);
        }

        for type_id in &held {
            if let Some(storage) = self.storages.get_mut(type_id) {
                storage.get_mut().remove_entity(entity);
            }
        }

        self.entities.remove(entity);
        log::trace!("despawned {entity:?} ({} components)", held.len());
        true
    }

    /// Whether `entity` is currently alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get an iterator over all live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Add a component to an entity
    ///
    /// If the entity already holds a `T`, the detach hooks see the old value,
    /// the value is replaced, and the old value is returned. Attach hooks run
    /// after the new value is stored. Inserting on a dead entity drops the
    /// component and logs a warning.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.entities.contains_key(entity) {
            log::warn!(
                "insert of {} on dead entity {entity:?} ignored",
                std::any::type_name::<T>()
            );
            return None;
        }

        let type_id = TypeId::of::<T>();
        if self.has::<T>(entity) {
            self.fire_detach(type_id, entity);
        }

        let replaced = self.typed_storage_entry::<T>().and_then(|storage| storage.insert(entity, component));

        self.fire_attach(type_id, entity);
        replaced
    }

    /// Remove a component from an entity
    ///
    /// Detach hooks run while the value is still stored.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.has::<T>(entity) {
            return None;
        }

        self.fire_detach(TypeId::of::<T>(), entity);
        self.typed_storage_entry::<T>()?.remove(entity)
    }

    /// Get a component from an entity
    ///
    /// # Panics
    /// Panics if the component storage is currently borrowed mutably.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        let storage = self.storage::<T>()?;
        Ref::filter_map(storage, |storage| storage.get(entity)).ok()
    }

    /// Get a mutable component from an entity
    ///
    /// # Panics
    /// Panics if the component storage is currently borrowed.
    pub fn get_mut<T: Component>(&self, entity: Entity) -> Option<RefMut<'_, T>> {
        let storage = self.storage_mut::<T>()?;
        RefMut::filter_map(storage, |storage| storage.get_mut(entity)).ok()
    }

    /// Whether `entity` holds a `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storages
            .get(&TypeId::of::<T>())
            .is_some_and(|storage| storage.borrow().contains(entity))
    }

    /// Number of entities holding a `T`
    pub fn count<T: Component>(&self) -> usize {
        self.storages
            .get(&TypeId::of::<T>())
            .map_or(0, |storage| storage.borrow().len())
    }

    /// Start a query over every entity holding all kinds named by `Q`
    ///
    /// # Panics
    /// Panics if `Q` borrows a kind mutably that is already borrowed, for
    /// example `(&mut Transform, &Transform)`.
    pub fn query<Q: QueryParam>(&self) -> Query<'_, Q> {
        Query::new(self)
    }

    /// Register a hook fired after a `T` is attached to an entity
    pub fn on_attach<T: Component>(&mut self, hook: Hook) {
        self.hooks.entry(TypeId::of::<T>()).or_default().on_attach.push(hook);
    }

    /// Register a hook fired before a `T` is detached from an entity
    pub fn on_detach<T: Component>(&mut self, hook: Hook) {
        self.hooks.entry(TypeId::of::<T>()).or_default().on_detach.push(hook);
    }

    /// Store a singleton resource, returning the previous one of that type
    pub fn insert_resource<R: 'static>(&mut self, resource: R) -> Option<R> {
        let boxed: Box<dyn Any> = Box::new(resource);
        self.resources
            .insert(TypeId::of::<R>(), RefCell::new(boxed))
            .and_then(|previous| previous.into_inner().downcast::<R>().ok())
            .map(|previous| *previous)
    }

    /// Remove a singleton resource
    pub fn remove_resource<R: 'static>(&mut self) -> Option<R> {
        self.resources
            .remove(&TypeId::of::<R>())
            .and_then(|resource| resource.into_inner().downcast::<R>().ok())
            .map(|resource| *resource)
    }

    /// Borrow a singleton resource
    ///
    /// # Panics
    /// Panics if the resource is currently borrowed mutably.
    pub fn resource<R: 'static>(&self) -> Option<Ref<'_, R>> {
        let cell = self.resources.get(&TypeId::of::<R>())?;
        Ref::filter_map(cell.borrow(), |resource| resource.downcast_ref::<R>()).ok()
    }

    /// Borrow a singleton resource mutably
    ///
    /// # Panics
    /// Panics if the resource is currently borrowed.
    pub fn resource_mut<R: 'static>(&self) -> Option<RefMut<'_, R>> {
        let cell = self.resources.get(&TypeId::of::<R>())?;
        RefMut::filter_map(cell.borrow_mut(), |resource| resource.downcast_mut::<R>()).ok()
    }

    /// Whether a resource of type `R` is stored
    pub fn has_resource<R: 'static>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<R>())
    }

    pub(crate) fn storage<T: Component>(&self) -> Option<Ref<'_, ComponentStorage<T>>> {
        let cell = self.storages.get(&TypeId::of::<T>())?;
        Ref::filter_map(cell.borrow(), |storage| {
            storage.as_any().downcast_ref::<ComponentStorage<T>>()
        })
        .ok()
    }

    pub(crate) fn storage_mut<T: Component>(&self) -> Option<RefMut<'_, ComponentStorage<T>>> {
        let cell = self.storages.get(&TypeId::of::<T>())?;
        RefMut::filter_map(cell.borrow_mut(), |storage| {
            storage.as_any_mut().downcast_mut::<ComponentStorage<T>>()
        })
        .ok()
    }

    fn typed_storage_entry<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let storage: Box<dyn ErasedStorage> = Box::new(ComponentStorage::<T>::new());
                RefCell::new(storage)
            })
            .get_mut()
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    fn fire_attach(&self, type_id: TypeId, entity: Entity) {
        if let Some(hooks) = self.hooks.get(&type_id) {
            for hook in &hooks.on_attach {
                hook(self, entity);
            }
        }
    }

    fn fire_detach(&self, type_id: TypeId, entity: Entity) {
        if let Some(hooks) = self.hooks.get(&type_id) {
            for hook in &hooks.on_detach {
                hook(self, entity);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
