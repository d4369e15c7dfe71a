//! Query system for iterating entities by component combination.
//!
//! This module provides a type-safe query API for iterating over entities
//! with specific component combinations. The type system expresses access
//! patterns (mutable vs immutable), and entities missing any requested kind
//! are filtered out with a single mask comparison.
//!
//! Single-kind queries walk the pool's dense array directly. Multi-kind
//! queries pick the smallest participating pool as the driver and resolve
//! the remaining kinds through their sparse arrays, so the cost scales with
//! the rarest component rather than the most common one.
//!
//! # Examples
//!
//! ```ignore
//! // Query single component
//! for (entity, transform) in world.query::<&mut TransformComponent>() {
//!     transform.position[1] += 1.0;
//! }
//!
//! // Query two components
//! for (entity, velocity, force) in world.query::<(&mut VelocityComponent, &ForceComponent)>() {
//!     velocity.acceleration = force.value / velocity.mass;
//! }
//! ```
//!
//! # Safety
//!
//! Multi-kind iterators hand out references into several pools resolved
//! through raw pointers. This is sound because:
//!
//! 1. Each requested kind maps to a distinct pool; duplicates are rejected
//!    at fetch time by `TypeId` comparison.
//! 2. The iterator holds the `&mut World` borrow for its whole lifetime, so
//!    no structural change can move pool storage while references are live.
//! 3. Every dense slot is resolved at most once per yielded entity.

mod iter1;
mod itern;

pub use iter1::*;
pub use itern::*;

use crate::components::Component;
use crate::world::World;

/// Trait for querying components from a world.
///
/// Implemented for `&T`, `&mut T` and tuples of two to six such references.
/// The tuple determines both the filter (all kinds must be present) and the
/// shape of the yielded item.
pub trait QueryData {
    /// The item type returned by the iterator.
    type Item<'a>;

    /// The iterator type that yields items.
    type Iter<'a>: Iterator<Item = Self::Item<'a>>;

    /// Fetches the query from the world.
    ///
    /// # Panics
    ///
    /// Panics if the same component type is requested multiple times in the
    /// query.
    fn fetch(world: &mut World) -> Self::Iter<'_>;
}

/// One element of a multi-kind query tuple: `&T` or `&mut T`.
pub trait QueryParam {
    /// The component kind this parameter reads or writes.
    type Target: Component;

    /// The reference type handed to the caller.
    type Item<'a>;

    /// Produces the caller-facing reference to one dense slot.
    ///
    /// # Safety
    ///
    /// `dense` must point into a live pool for `Target`, `slot` must be in
    /// bounds, and the caller must guarantee no other live reference to the
    /// same slot.
    unsafe fn resolve<'a>(dense: *mut Self::Target, slot: usize) -> Self::Item<'a>;
}

impl<T: Component> QueryParam for &T {
    type Target = T;
    type Item<'a> = &'a T;

    unsafe fn resolve<'a>(dense: *mut T, slot: usize) -> &'a T {
        &*dense.add(slot)
    }
}

impl<T: Component> QueryParam for &mut T {
    type Target = T;
    type Item<'a> = &'a mut T;

    unsafe fn resolve<'a>(dense: *mut T, slot: usize) -> &'a mut T {
        &mut *dense.add(slot)
    }
}
