// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! World management
//!
//! The World is the central container for all ECS data,
//! managing entities, components, and providing query interfaces.
//!
//! Destruction is two-phase. [`World::destroy_entity`] takes the entity out
//! of the active set at once, so queries stop returning it, but its
//! components stay in their pools until [`World::flush_destroyed`] runs at
//! the end of the update phase.

use crate::ecs::query::{Query, QueryKinds};
use crate::ecs::{Component, ComponentPool, ComponentStorage, Entity, EntityId, StoreId};
use crate::error::{EcsError, Result};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};

/// The main ECS world container
///
/// World manages entity lifecycles, owns one pool per component kind and
/// serves as the central access point for all ECS operations.
///
/// Access is deliberately asymmetric: `add_component` and `get_component`
/// fail with [`EcsError::InactiveEntity`] for inactive entities, while
/// `has_component` and `remove_component` quietly report `false`/`None`.
///
/// # Example
///
/// ```
/// use sim_core::ecs::World;
/// use sim_core::ecs::components::Health;
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.add_component(entity, Health::new(3)).unwrap();
///
/// world.destroy_entity(entity);
/// assert!(world.get_component::<Health>(entity).is_err());
/// assert_eq!(world.flush_destroyed(), 1);
/// ```
pub struct World {
    store: StoreId,
    next_id: u64,
    active: HashSet<EntityId>,
    pending_destroy: HashSet<EntityId>,
    pools: HashMap<TypeId, Box<dyn ComponentStorage>>,
    pool_capacity: usize,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a world whose pools start with room for `pool_capacity` components
    pub fn with_capacity(pool_capacity: usize) -> Self {
        World {
            store: StoreId::next(),
            next_id: 0,
            active: HashSet::with_capacity(pool_capacity),
            pending_destroy: HashSet::new(),
            pools: HashMap::new(),
            pool_capacity,
        }
    }

    /// Token identifying this world; every handle it creates carries it
    pub fn store_id(&self) -> StoreId {
        self.store
    }

    /// Create a new entity
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted. Ids are never reused or wrapped.
    pub fn create_entity(&mut self) -> Entity {
        let id = EntityId::new(self.next_id);
        self.next_id = match self.next_id.checked_add(1) {
            Some(next) => next,
            None => panic!("entity id space exhausted"),
        };
        self.active.insert(id);
        Entity::new(id, self.store)
    }

    /// Request destruction of an entity
    ///
    /// The entity leaves the active set immediately; its components are
    /// purged by the next [`flush_destroyed`](Self::flush_destroyed).
    /// Returns `false` if the entity was not active (already destroyed,
    /// never created, or from another world).
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if entity.store() != self.store || !self.active.remove(&entity.id()) {
            return false;
        }
        self.pending_destroy.insert(entity.id());
        log::trace!("entity {} pending destroy", entity.id());
        true
    }

    /// Purge the components of every entity pending destruction
    ///
    /// Must be called where no query is in flight; the scheduler does this
    /// once per tick after the update systems. Returns the number of
    /// entities purged.
    pub fn flush_destroyed(&mut self) -> usize {
        let purged = self.pending_destroy.len();
        if purged == 0 {
            return 0;
        }
        for id in self.pending_destroy.drain() {
            for pool in self.pools.values_mut() {
                pool.remove_entity(id);
            }
        }
        log::debug!("flushed {} destroyed entities", purged);
        purged
    }

    /// Check if an entity is alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.store() == self.store && self.active.contains(&entity.id())
    }

    /// Check if an entity was destroyed but not yet flushed
    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        entity.store() == self.store && self.pending_destroy.contains(&entity.id())
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.active.len()
    }

    /// Get the number of entities waiting for the next flush
    pub fn pending_destroy_count(&self) -> usize {
        self.pending_destroy.len()
    }

    /// Get an iterator over all alive entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        let store = self.store;
        self.active.iter().map(move |&id| Entity::new(id, store))
    }

    /// Attach a component, overwriting any existing one of the same kind
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<&mut T> {
        let id = self.ensure_active(entity)?;
        Ok(self.pool_or_insert::<T>().add(id, value))
    }

    /// Get a component of an active entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T> {
        let id = self.ensure_active(entity)?;
        match self.pool::<T>() {
            Some(pool) => pool.get(id),
            None => Err(not_found::<T>(id)),
        }
    }

    /// Get a mutable reference to a component of an active entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        let id = self.ensure_active(entity)?;
        match self.pool_mut::<T>() {
            Some(pool) => pool.get_mut(id),
            None => Err(not_found::<T>(id)),
        }
    }

    /// Run a closure against a component of an active entity
    pub fn with_component_mut<T: Component, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R> {
        self.get_component_mut::<T>(entity).map(f)
    }

    /// Check if an entity has a component. `false` for inactive entities.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.pool::<T>().is_some_and(|pool| pool.has(entity.id()))
    }

    /// Remove a component. No-op for inactive entities.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.pool_mut::<T>()?.remove(entity.id())
    }

    /// Iterate the active entities carrying every kind in `Q`
    ///
    /// `Q` is a tuple of one to four component types, e.g.
    /// `world.query::<(Transform, Collider)>()`. Each matching entity
    /// appears exactly once; order is unspecified.
    pub fn query<Q: QueryKinds>(&self) -> Query<'_> {
        let pools = Q::kinds()
            .into_iter()
            .map(|kind| self.pools.get(&kind).map(|pool| pool.as_ref()))
            .collect();
        Query::new(self.store, &self.active, pools)
    }

    /// Read-only access to the pool of one component kind
    ///
    /// Unlike [`get_component`](Self::get_component), the pool still holds
    /// components of entities pending destruction until the next flush.
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.pools
            .get(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any().downcast_ref::<ComponentPool<T>>())
    }

    /// Number of component kinds that have ever been stored
    pub fn component_kind_count(&self) -> usize {
        self.pools.len()
    }

    /// Drop every entity and component
    ///
    /// The id counter is kept, so handles issued before the clear stay dead.
    pub fn clear(&mut self) {
        self.active.clear();
        self.pending_destroy.clear();
        for pool in self.pools.values_mut() {
            pool.clear_all();
        }
    }

    fn ensure_active(&self, entity: Entity) -> Result<EntityId> {
        if self.is_alive(entity) {
            Ok(entity.id())
        } else {
            Err(EcsError::InactiveEntity { entity: entity.id() })
        }
    }

    fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<T>>())
    }

    fn pool_or_insert<T: Component>(&mut self) -> &mut ComponentPool<T> {
        let capacity = self.pool_capacity;
        let pool = self
            .pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentPool::<T>::with_capacity(capacity)));
        match pool.as_any_mut().downcast_mut::<ComponentPool<T>>() {
            Some(pool) => pool,
            None => unreachable!("pool registered under a foreign TypeId"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found<T: Component>(id: EntityId) -> EcsError {
    EcsError::ComponentNotFound {
        entity: id,
        component: std::any::type_name::<T>(),
    }
}
