//! Error types for the fallible parts of the public surface.
//!
//! Most misuse of the engine is a programming error and panics (see the
//! assertions in [`crate::World`]); the `try_*` lookups surface the failure
//! as a value instead for embedders that prefer to recover.

use thiserror::Error;

use super::entity::EntityId;

/// Errors returned by fallible entity lookups.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// Entity id outside the entity table.
    #[error("entity id {id} is out of bounds (entity table holds {len})")]
    OutOfBounds {
        /// The offending id.
        id: u32,
        /// Current entity table length.
        len: usize,
    },

    /// The entity slot exists but was destroyed.
    #[error("{0} is not alive")]
    NotAlive(EntityId),
}

/// Result type for fallible ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
