//! Single component query iterators.
//!
//! Presence in a pool's dense array already implies ownership, so these
//! iterators walk the dense and owner arrays directly with no mask check.

use super::QueryData;
use crate::components::Component;
use crate::entity::EntityId;
use crate::storage::ComponentPool;
use crate::world::World;

/// Iterator for querying a single immutable component.
pub struct QueryIter1<'a, T: Component> {
    iter: std::iter::Zip<std::slice::Iter<'a, EntityId>, std::slice::Iter<'a, T>>,
}

impl<'a, T: Component> Iterator for QueryIter1<'a, T> {
    type Item = (EntityId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(id, component)| (*id, component))
    }
}

/// Iterator for querying a single mutable component.
pub struct QueryIter1Mut<'a, T: Component> {
    iter: std::iter::Zip<std::slice::Iter<'a, EntityId>, std::slice::IterMut<'a, T>>,
}

impl<'a, T: Component> Iterator for QueryIter1Mut<'a, T> {
    type Item = (EntityId, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(id, component)| (*id, component))
    }
}

// Implement QueryData for a single immutable component
impl<T: Component> QueryData for &T {
    type Item<'a> = (EntityId, &'a T);
    type Iter<'a> = QueryIter1<'a, T>;

    fn fetch(world: &mut World) -> Self::Iter<'_> {
        if let Some(pool) = world.registry.get::<T>() {
            QueryIter1 {
                iter: pool.entities.iter().zip(pool.dense.iter()),
            }
        } else {
            QueryIter1 {
                iter: [].iter().zip([].iter()),
            }
        }
    }
}

// Implement QueryData for a single mutable component
impl<T: Component> QueryData for &mut T {
    type Item<'a> = (EntityId, &'a mut T);
    type Iter<'a> = QueryIter1Mut<'a, T>;

    fn fetch(world: &mut World) -> Self::Iter<'_> {
        if let Some(pool) = world.registry.get_mut::<T>() {
            let ComponentPool {
                entities, dense, ..
            } = pool;
            QueryIter1Mut {
                iter: entities.iter().zip(dense.iter_mut()),
            }
        } else {
            QueryIter1Mut {
                iter: [].iter().zip([].iter_mut()),
            }
        }
    }
}
