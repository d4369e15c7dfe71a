use crate::components::Component;
use crate::entity::{EntityId, EntityMeta, Mask};
use crate::error::{EcsError, EcsResult};
use crate::query::QueryData;
use crate::storage::{ComponentPool, PoolRegistry};
use crate::system::{System, SystemEntry, SystemOrder};

use log::debug;

/// World is the central manager for the ECS.
///
/// It owns the entity table, the stack of recycled ids, and one component
/// pool per registered kind. All component data lives in the pools as
/// contiguous arrays, so iteration through [`World::query`] stays
/// cache-friendly regardless of how many kinds an entity carries.
///
/// # Examples
///
/// ```
/// use hekla_ecs::{World, Component};
///
/// #[derive(Component, Default)]
/// struct TransformComponent {
///     position: [f32; 3],
/// }
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.add_component(entity, TransformComponent::default());
/// assert!(world.has_component::<TransformComponent>(entity));
/// ```
pub struct World {
    /// Entity table; the id is the index.
    pub(crate) entities: Vec<EntityMeta>,
    /// Destroyed ids available for reuse, popped LIFO.
    free: Vec<EntityId>,
    /// One pool per registered component kind.
    pub(crate) registry: PoolRegistry,
    /// Systems stepped by [`World::update`], kept sorted by [`SystemOrder`].
    systems: Vec<SystemEntry>,
}

impl World {
    /// Creates a new empty World.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            free: Vec::new(),
            registry: PoolRegistry::new(),
            systems: Vec::new(),
        }
    }

    /// Creates a new entity and returns its ID.
    ///
    /// Ids of destroyed entities are reused, most recently destroyed first.
    /// No generation counter is kept: a stale id held across a destroy will
    /// address whichever entity currently occupies the slot.
    pub fn create_entity(&mut self) -> EntityId {
        if let Some(id) = self.free.pop() {
            let meta = &mut self.entities[id.index()];
            meta.alive = true;
            meta.mask = Mask::EMPTY;
            id
        } else {
            let id = EntityId::new(self.entities.len() as u32);
            self.entities.push(EntityMeta {
                mask: Mask::EMPTY,
                alive: true,
            });
            id
        }
    }

    /// Creates a new entity and returns a handle to it.
    ///
    /// Convenience over [`World::create_entity`] for immediately attaching
    /// components.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let id = self.create_entity();
        EntityMut { world: self, id }
    }

    /// Destroys an entity and removes all its components.
    ///
    /// Every pool named by the entity's mask performs its swap-and-pop
    /// removal, the mask is cleared and the id pushed onto the free stack.
    /// Returns `true` if the entity was alive, `false` for an already-dead
    /// id (destroying twice is a no-op).
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let meta = self.entities[id.index()];
        if !meta.alive {
            return false;
        }

        for pool in self.registry.pools_mut() {
            if meta.mask.has(pool.bit()) {
                let removed = pool.remove_entity(id);
                debug_assert!(removed && !pool.contains_entity(id));
            }
        }

        let meta = &mut self.entities[id.index()];
        meta.mask = Mask::EMPTY;
        meta.alive = false;
        self.free.push(id);
        true
    }

    /// Returns true if the id names a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(id.index()).map_or(false, |meta| meta.alive)
    }

    /// Returns the number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len() - self.free.len()
    }

    /// Adds a component to an entity.
    ///
    /// If the entity already has this component kind, the value is replaced
    /// in place. Panics if the entity is dead or the id out of bounds.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) {
        let table_len = self.entities.len();
        assert!(
            self.entities[id.index()].alive,
            "cannot add a component to dead {}",
            id
        );

        let pool = self.registry.get_or_create::<T>(table_len);
        pool.insert(id, component);
        let bit = pool.bit();
        self.entities[id.index()].mask.set(bit);
    }

    /// Removes a component from an entity.
    ///
    /// Returns `true` if the component existed. Removing an absent component
    /// is a no-op, even when the kind's pool was never created.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> bool {
        let meta = self.entities[id.index()];
        let Some(pool) = self.registry.get_mut::<T>() else {
            return false;
        };
        let bit = pool.bit();
        if !meta.mask.has(bit) {
            return false;
        }

        let removed = pool.remove(id);
        debug_assert!(removed);
        self.entities[id.index()].mask.clear(bit);
        true
    }

    /// Checks if an entity has a specific component.
    ///
    /// This is a mask bit test; the pool's sparse array is never consulted.
    /// Panics if the id is out of bounds.
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        let meta = self.entities[id.index()];
        match self.registry.get::<T>() {
            Some(pool) => meta.mask.has(pool.bit()),
            None => false,
        }
    }

    /// Gets a reference to a component for a specific entity.
    ///
    /// Use this for accessing individual entities by ID. For iterating over
    /// multiple entities with components, prefer [`World::query`]. Returns
    /// `None` when the entity does not own the component; panics if the id
    /// is out of bounds.
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        let meta = self.entities[id.index()];
        let pool = self.registry.get::<T>()?;
        if !meta.mask.has(pool.bit()) {
            return None;
        }
        pool.get(id)
    }

    /// Gets a mutable reference to a component for a specific entity.
    ///
    /// See [`World::get_component`]; the returned reference is valid until
    /// the next structural change of this component kind.
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let meta = self.entities[id.index()];
        let pool = self.registry.get_mut::<T>()?;
        if !meta.mask.has(pool.bit()) {
            return None;
        }
        pool.get_mut(id)
    }

    /// Gets the pool for a component kind, if any entity ever owned one.
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.registry.get::<T>()
    }

    /// Creates a query for iterating over entities with specific components.
    ///
    /// Multi-kind queries drive iteration by the smallest participating pool
    /// and filter the rest with one mask comparison per entity. Component
    /// values are yielded by reference and may be mutated in place; the
    /// iterator holds the world borrow, so structural changes while iterating
    /// are rejected at compile time.
    ///
    /// # Example
    ///
    /// ```
    /// use hekla_ecs::{World, Component};
    ///
    /// #[derive(Component)]
    /// struct Position {
    ///     x: f32,
    /// }
    ///
    /// #[derive(Component)]
    /// struct Velocity {
    ///     dx: f32,
    /// }
    ///
    /// let mut world = World::new();
    /// let entity = world.create_entity();
    /// world.add_component(entity, Position { x: 0.0 });
    /// world.add_component(entity, Velocity { dx: 1.5 });
    ///
    /// for (_entity, position, velocity) in world.query::<(&mut Position, &Velocity)>() {
    ///     position.x += velocity.dx;
    /// }
    /// assert_eq!(world.get_component::<Position>(entity).unwrap().x, 1.5);
    /// ```
    pub fn query<Q: QueryData>(&mut self) -> Q::Iter<'_> {
        Q::fetch(self)
    }

    /// Returns a read-only handle to a live entity.
    ///
    /// Panics if the id is out of bounds or the entity is dead; see
    /// [`World::try_entity`] for the fallible variant.
    pub fn entity(&self, id: EntityId) -> EntityRef<'_> {
        assert!(self.entities[id.index()].alive, "{} is not alive", id);
        EntityRef { world: self, id }
    }

    /// Returns a mutating handle to a live entity.
    ///
    /// Panics if the id is out of bounds or the entity is dead; see
    /// [`World::try_entity_mut`] for the fallible variant.
    pub fn entity_mut(&mut self, id: EntityId) -> EntityMut<'_> {
        assert!(self.entities[id.index()].alive, "{} is not alive", id);
        EntityMut { world: self, id }
    }

    /// Fallible variant of [`World::entity`].
    pub fn try_entity(&self, id: EntityId) -> EcsResult<EntityRef<'_>> {
        match self.entities.get(id.index()) {
            None => Err(EcsError::OutOfBounds {
                id: id.id(),
                len: self.entities.len(),
            }),
            Some(meta) if !meta.alive => Err(EcsError::NotAlive(id)),
            Some(_) => Ok(EntityRef { world: self, id }),
        }
    }

    /// Fallible variant of [`World::entity_mut`].
    pub fn try_entity_mut(&mut self, id: EntityId) -> EcsResult<EntityMut<'_>> {
        match self.entities.get(id.index()) {
            None => Err(EcsError::OutOfBounds {
                id: id.id(),
                len: self.entities.len(),
            }),
            Some(meta) if !meta.alive => Err(EcsError::NotAlive(id)),
            Some(_) => Ok(EntityMut { world: self, id }),
        }
    }

    /// Registers a system to run on every [`World::update`].
    ///
    /// The system's `initialize` hook fires immediately. Placement in the
    /// update sequence follows `order`; systems sharing an order value run
    /// in the order they were registered.
    pub fn register_system(&mut self, system: Box<dyn System>, order: SystemOrder) {
        let mut entry = SystemEntry { order, system };
        entry.system.initialize();
        self.insert_sorted(entry);
    }

    /// Slots an entry behind every system of equal or lower order.
    fn insert_sorted(&mut self, entry: SystemEntry) {
        let at = self
            .systems
            .partition_point(|existing| existing.order <= entry.order);
        self.systems.insert(at, entry);
    }

    /// Runs one update pass over the registered systems.
    ///
    /// Call once per frame. Enabled systems execute in ascending
    /// [`SystemOrder`], each receiving the world mutably together with
    /// `delta_time`, the seconds elapsed since the previous frame.
    pub fn update(&mut self, delta_time: f32) {
        // The list is taken out for the pass so every system can borrow the
        // world mutably.
        let mut active = std::mem::take(&mut self.systems);
        for entry in &mut active {
            if entry.system.is_enabled() {
                entry.system.update(self, delta_time);
            }
        }

        // A running system may itself have registered systems; those landed
        // in self.systems and are folded back into the sorted list.
        let late = std::mem::replace(&mut self.systems, active);
        for entry in late {
            self.insert_sorted(entry);
        }
    }

    /// Returns how many systems are registered.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Shuts down and drops every registered system.
    pub fn clear_systems(&mut self) {
        for entry in &mut self.systems {
            entry.system.shutdown();
        }
        self.systems.clear();
    }

    /// Returns the world to its freshly-constructed state.
    ///
    /// The entity table, the free stack and every pool are dropped and all
    /// membership bits are released for reassignment. Outstanding entity ids
    /// are invalidated. Registered systems are kept; use
    /// [`World::clear_systems`] to drop those.
    pub fn clear(&mut self) {
        debug!(
            "clearing world: {} live entities, {} pools",
            self.entity_count(),
            self.registry.pool_count()
        );
        self.entities.clear();
        self.free.clear();
        self.registry.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        // Systems get their shutdown hook even when the world itself goes away.
        self.clear_systems();
    }
}

/// Read-only handle to a live entity.
///
/// A thin wrapper over the world and an id; every accessor reads through to
/// the canonical entity table, so the handle can never observe stale state.
pub struct EntityRef<'w> {
    world: &'w World,
    id: EntityId,
}

impl EntityRef<'_> {
    /// The entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's canonical membership mask.
    pub fn mask(&self) -> Mask {
        self.world.entities[self.id.index()].mask
    }

    /// Returns true if the entity has a component of kind `T`.
    pub fn has<T: Component>(&self) -> bool {
        self.world.has_component::<T>(self.id)
    }

    /// Gets a reference to the entity's component of kind `T`.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get_component::<T>(self.id)
    }
}

/// Mutating handle to a live entity.
///
/// Offers the same operations as the id-based world surface; the handle
/// borrows the world exclusively, so it cannot coexist with queries or other
/// handles.
pub struct EntityMut<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl EntityMut<'_> {
    /// The entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's canonical membership mask.
    pub fn mask(&self) -> Mask {
        self.world.entities[self.id.index()].mask
    }

    /// Returns true if the entity has a component of kind `T`.
    pub fn has<T: Component>(&self) -> bool {
        self.world.has_component::<T>(self.id)
    }

    /// Gets a reference to the entity's component of kind `T`.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get_component::<T>(self.id)
    }

    /// Gets a mutable reference to the entity's component of kind `T`.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_component_mut::<T>(self.id)
    }

    /// Adds (or replaces) a component on this entity.
    pub fn insert<T: Component>(&mut self, component: T) -> &mut Self {
        self.world.add_component(self.id, component);
        self
    }

    /// Removes a component of kind `T` from this entity, if present.
    pub fn remove<T: Component>(&mut self) -> &mut Self {
        self.world.remove_component::<T>(self.id);
        self
    }

    /// Destroys this entity, consuming the handle.
    pub fn destroy(self) {
        self.world.destroy_entity(self.id);
    }
}
