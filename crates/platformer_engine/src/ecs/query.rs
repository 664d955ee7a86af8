//! Query system for component access
//!
//! A query names the component kinds it needs as a tuple of references:
//! `&T` borrows a kind for reading, `&mut T` for writing. Only entities that
//! hold every requested kind are visited.
//!
//! ```
//! use platformer_engine::ecs::{Collider, Transform, World};
//!
//! let world = World::new();
//! world.query::<(&mut Transform, &Collider)>().for_each(|_entity, (transform, collider)| {
//!     let _ = (transform, collider);
//! });
//! ```

use std::cell::{Ref, RefMut};

use super::{Component, ComponentStorage, Entity, World};

/// One parameter of a query: a component borrow or a tuple of them
pub trait QueryParam {
    /// Storage guards held for the lifetime of the query
    type Borrow<'w>;

    /// Item handed to the caller for one entity
    type Item<'b>;

    /// Borrow the storages this parameter needs; `None` when a kind has
    /// never been inserted, so no entity can match
    fn borrow(world: &World) -> Option<Self::Borrow<'_>>;

    /// Fetch the item for `entity`, or `None` when it lacks a kind
    fn fetch<'b>(borrow: &'b mut Self::Borrow<'_>, entity: Entity) -> Option<Self::Item<'b>>;
}

impl<T: Component> QueryParam for &T {
    type Borrow<'w> = Ref<'w, ComponentStorage<T>>;
    type Item<'b> = &'b T;

    fn borrow(world: &World) -> Option<Self::Borrow<'_>> {
        world.storage::<T>()
    }

    fn fetch<'b>(borrow: &'b mut Self::Borrow<'_>, entity: Entity) -> Option<Self::Item<'b>> {
        borrow.get(entity)
    }
}

impl<T: Component> QueryParam for &mut T {
    type Borrow<'w> = RefMut<'w, ComponentStorage<T>>;
    type Item<'b> = &'b mut T;

    fn borrow(world: &World) -> Option<Self::Borrow<'_>> {
        world.storage_mut::<T>()
    }

    fn fetch<'b>(borrow: &'b mut Self::Borrow<'_>, entity: Entity) -> Option<Self::Item<'b>> {
        borrow.get_mut(entity)
    }
}

macro_rules! impl_query_tuple {
    ($($param:ident $guard:ident),+) => {
        impl<$($param: QueryParam),+> QueryParam for ($($param,)+) {
            type Borrow<'w> = ($($param::Borrow<'w>,)+);
            type Item<'b> = ($($param::Item<'b>,)+);

            fn borrow(world: &World) -> Option<Self::Borrow<'_>> {
                Some(($($param::borrow(world)?,)+))
            }

            fn fetch<'b>(borrow: &'b mut Self::Borrow<'_>, entity: Entity) -> Option<Self::Item<'b>> {
                let ($($guard,)+) = borrow;
                Some(($($param::fetch($guard, entity)?,)+))
            }
        }
    };
}

impl_query_tuple!(A a);
impl_query_tuple!(A a, B b);
impl_query_tuple!(A a, B b, C c);
impl_query_tuple!(A a, B b, C c, D d);

/// Live query over a world
///
/// Holds the storage borrows until dropped. The world cannot be structurally
/// changed while a query exists; collect [`Query::entities`] first when the
/// caller needs to spawn or despawn.
pub struct Query<'w, Q: QueryParam> {
    world: &'w World,
    borrow: Option<Q::Borrow<'w>>,
}

impl<'w, Q: QueryParam> Query<'w, Q> {
    pub(crate) fn new(world: &'w World) -> Self {
        Self {
            world,
            borrow: Q::borrow(world),
        }
    }

    /// Visit every matching entity
    pub fn for_each(&mut self, mut f: impl FnMut(Entity, Q::Item<'_>)) {
        let Some(borrow) = self.borrow.as_mut() else {
            return;
        };
        for entity in self.world.entities() {
            if let Some(item) = Q::fetch(borrow, entity) {
                f(entity, item);
            }
        }
    }

    /// Fetch the item for one entity
    pub fn get(&mut self, entity: Entity) -> Option<Q::Item<'_>> {
        let borrow = self.borrow.as_mut()?;
        Q::fetch(borrow, entity)
    }

    /// Collect the matching entity identifiers
    pub fn entities(&mut self) -> Vec<Entity> {
        let mut matched = Vec::new();
        self.for_each(|entity, _| matched.push(entity));
        matched
    }

    /// Number of matching entities
    pub fn count(&mut self) -> usize {
        let mut count = 0;
        self.for_each(|_, _| count += 1);
        count
    }
}
