//! Multi-kind query iterators.
//!
//! Iteration is driven by the smallest participating pool: its owner list is
//! walked in dense order, and each owner's membership mask is tested against
//! the combined mask of every requested kind in one comparison. Matching
//! entities resolve each kind through that pool's sparse array. The arities
//! are generated from one template; only the tuple length differs.

use super::{QueryData, QueryParam};
use crate::entity::{EntityId, EntityMeta, Mask};
use crate::storage::RawPool;
use crate::world::World;
use std::any::TypeId;
use std::marker::PhantomData;

macro_rules! impl_query {
    ($iter:ident; $($P:ident $pool:ident),+) => {
        /// Iterator over entities owning every requested component kind.
        pub struct $iter<'w, $($P: QueryParam),+> {
            /// Canonical entity rows, read for mask filtering.
            entities: &'w [EntityMeta],
            /// Owner ids of the driver pool (the smallest participant).
            owners: *const EntityId,
            owners_len: usize,
            cursor: usize,
            /// Combined membership mask of every requested kind.
            mask: Mask,
            $($pool: RawPool<$P::Target>,)+
            _world: PhantomData<&'w mut World>,
        }

        impl<'w, $($P: QueryParam),+> $iter<'w, $($P),+> {
            /// A query naming an unregistered kind yields nothing.
            fn empty() -> Self {
                Self {
                    entities: &[],
                    owners: std::ptr::null(),
                    owners_len: 0,
                    cursor: 0,
                    mask: Mask::EMPTY,
                    $($pool: RawPool::dangling(),)+
                    _world: PhantomData,
                }
            }
        }

        impl<'w, $($P: QueryParam),+> Iterator for $iter<'w, $($P),+> {
            type Item = (EntityId, $($P::Item<'w>),+);

            fn next(&mut self) -> Option<Self::Item> {
                while self.cursor < self.owners_len {
                    // SAFETY: cursor is bounds-checked against the driver
                    // length, and the owner array cannot move while the
                    // iterator holds the world borrow.
                    let id = unsafe { *self.owners.add(self.cursor) };
                    self.cursor += 1;

                    if !self.entities[id.index()].mask.contains_all(self.mask) {
                        continue;
                    }

                    // SAFETY: the mask test proves every participating pool
                    // owns a component for `id`, so each sparse lookup lands
                    // on a valid dense slot. Requested kinds are pairwise
                    // distinct (checked in `fetch`), so the yielded
                    // references never alias.
                    unsafe {
                        return Some((
                            id,
                            $($P::resolve(self.$pool.dense, self.$pool.slot(id))),+
                        ));
                    }
                }
                None
            }
        }

        impl<$($P: QueryParam),+> QueryData for ($($P,)+) {
            type Item<'a> = (EntityId, $($P::Item<'a>),+);
            type Iter<'a> = $iter<'a, $($P),+>;

            fn fetch(world: &mut World) -> Self::Iter<'_> {
                let types = [$(TypeId::of::<$P::Target>()),+];
                for i in 0..types.len() {
                    for j in (i + 1)..types.len() {
                        assert_ne!(
                            types[i], types[j],
                            "cannot query the same component type twice"
                        );
                    }
                }

                // The entity table is read for mask filtering while the pools
                // hand out component references; the two are disjoint world
                // fields, so the borrows split safely.
                let entities = &world.entities[..];
                let registry = &mut world.registry;

                $(
                    let $pool = match registry.get_mut::<$P::Target>() {
                        Some(pool) => pool.raw(),
                        None => return $iter::empty(),
                    };
                )+

                let mut mask = Mask::EMPTY;
                $(mask.set($pool.bit);)+

                // Drive iteration by the smallest participating pool.
                let mut owners: *const EntityId = std::ptr::null();
                let mut owners_len = usize::MAX;
                $(
                    if $pool.len < owners_len {
                        owners_len = $pool.len;
                        owners = $pool.owners;
                    }
                )+

                $iter {
                    entities,
                    owners,
                    owners_len,
                    cursor: 0,
                    mask,
                    $($pool,)+
                    _world: PhantomData,
                }
            }
        }
    };
}

impl_query!(QueryIter2; P1 pool1, P2 pool2);
impl_query!(QueryIter3; P1 pool1, P2 pool2, P3 pool3);
impl_query!(QueryIter4; P1 pool1, P2 pool2, P3 pool3, P4 pool4);
impl_query!(QueryIter5; P1 pool1, P2 pool2, P3 pool3, P4 pool4, P5 pool5);
impl_query!(QueryIter6; P1 pool1, P2 pool2, P3 pool3, P4 pool4, P5 pool5, P6 pool6);
