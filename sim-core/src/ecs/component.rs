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
//! Component storage and management
//!
//! Components are data containers that can be attached to entities.
//! Every component kind lives in its own [`ComponentPool`], a dense array
//! with id/slot translation tables, so a full-pool pass touches contiguous
//! memory only.
//!
//! The [`World`](crate::ecs::World) holds pools behind the non-generic
//! [`ComponentStorage`] trait. Bulk operations such as purging a destroyed
//! entity go through that trait, typed access downcasts back to the
//! concrete pool.

use crate::ecs::EntityId;
use crate::error::{EcsError, Result};
use std::any::Any;
use std::collections::HashMap;

/// Smallest capacity a pool grows to on its first insertion
const MIN_CAPACITY: usize = 8;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
/// Keep components small and focused for better cache performance.
pub trait Component: 'static + Send + Sync {}

/// Type-erased view of a component pool
///
/// Exposes only id-based operations so the world can treat pools of
/// different kinds uniformly.
pub trait ComponentStorage: Send + Sync {
    /// Check if the entity has a slot in this pool
    fn contains(&self, id: EntityId) -> bool;

    /// Drop the entity's component, if present. Returns whether a slot was freed.
    fn remove_entity(&mut self, id: EntityId) -> bool;

    /// Ids of every live slot, in dense order
    fn live_ids(&self) -> &[EntityId];

    /// Number of live slots
    fn live_count(&self) -> usize;

    /// Type name of the stored component
    fn component_name(&self) -> &'static str;

    /// Drop every component in the pool
    fn clear_all(&mut self);

    /// Allow downcasting to the concrete pool type
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete pool type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense per-kind component storage
///
/// Components are packed with no gaps: removal moves the last live slot into
/// the freed one and patches both translation tables. For every live id `e`,
/// `entity_to_slot[e] < len()` and `slot_to_entity[entity_to_slot[e]] == e`.
///
/// The backing arrays double their capacity when full. References handed out
/// by the pool are only valid until the next mutating call, which the borrow
/// checker enforces.
///
/// # Example
///
/// ```
/// use sim_core::ecs::{Component, ComponentPool, EntityId};
///
/// #[derive(Debug, PartialEq)]
/// struct Score(u32);
/// impl Component for Score {}
///
/// let mut pool = ComponentPool::<Score>::new();
/// pool.add(EntityId::new(1), Score(10));
/// pool.add(EntityId::new(2), Score(20));
/// pool.remove(EntityId::new(1));
///
/// assert_eq!(pool.len(), 1);
/// assert_eq!(pool.get(EntityId::new(2)).unwrap(), &Score(20));
/// ```
pub struct ComponentPool<T: Component> {
    /// Live components, packed
    dense: Vec<T>,
    /// Mapping from entity id to dense slot
    entity_to_slot: HashMap<EntityId, usize>,
    /// Mapping from dense slot back to entity id (for swap-remove)
    slot_to_entity: Vec<EntityId>,
}

impl<T: Component> ComponentPool<T> {
    /// Create a new empty pool
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new pool with room for `capacity` components
    pub fn with_capacity(capacity: usize) -> Self {
        ComponentPool {
            dense: Vec::with_capacity(capacity),
            entity_to_slot: HashMap::with_capacity(capacity),
            slot_to_entity: Vec::with_capacity(capacity),
        }
    }

    /// Attach a component to an entity, overwriting any existing one in place
    pub fn add(&mut self, id: EntityId, value: T) -> &mut T {
        if let Some(&slot) = self.entity_to_slot.get(&id) {
            let existing = &mut self.dense[slot];
            *existing = value;
            return existing;
        }

        self.grow_if_full();
        let slot = self.dense.len();
        self.dense.push(value);
        self.slot_to_entity.push(id);
        self.entity_to_slot.insert(id, slot);

        debug_assert_eq!(self.entity_to_slot.len(), self.slot_to_entity.len());
        debug_assert_eq!(self.entity_to_slot.len(), self.dense.len());

        &mut self.dense[slot]
    }

    /// Get the component for an entity
    pub fn get(&self, id: EntityId) -> Result<&T> {
        match self.entity_to_slot.get(&id) {
            Some(&slot) => Ok(&self.dense[slot]),
            None => Err(Self::not_found(id)),
        }
    }

    /// Get a mutable reference to the component for an entity
    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut T> {
        match self.entity_to_slot.get(&id) {
            Some(&slot) => Ok(&mut self.dense[slot]),
            None => Err(Self::not_found(id)),
        }
    }

    /// Remove the entity's component, swapping the last live slot into its place
    ///
    /// Returns the removed value, or `None` if the entity had no slot.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.entity_to_slot.remove(&id)?;
        let last = self.dense.len() - 1;

        if slot != last {
            let moved = self.slot_to_entity[last];
            self.entity_to_slot.insert(moved, slot);
        }
        self.slot_to_entity.swap_remove(slot);
        let removed = self.dense.swap_remove(slot);

        debug_assert_eq!(self.entity_to_slot.len(), self.slot_to_entity.len());
        debug_assert_eq!(self.entity_to_slot.len(), self.dense.len());

        Some(removed)
    }

    /// Check if an entity has a component in this pool
    pub fn has(&self, id: EntityId) -> bool {
        self.entity_to_slot.contains_key(&id)
    }

    /// Iterate the ids of all live slots
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slot_to_entity.iter().copied()
    }

    /// Iterate `(id, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.slot_to_entity.iter().copied().zip(self.dense.iter())
    }

    /// Get the dense slot index of an entity, if it has one
    pub fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.entity_to_slot.get(&id).copied()
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Number of slots allocated, live or not
    pub fn capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// The packed component array
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// The packed component array, mutably
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Drop every component
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entity_to_slot.clear();
        self.slot_to_entity.clear();
    }

    fn grow_if_full(&mut self) {
        if self.dense.len() < self.dense.capacity() {
            return;
        }
        let additional = self.dense.capacity().max(MIN_CAPACITY);
        self.dense.reserve_exact(additional);
        self.slot_to_entity.reserve_exact(additional);
        log::trace!(
            "pool `{}` grew to {} slots",
            std::any::type_name::<T>(),
            self.dense.capacity()
        );
    }

    fn not_found(id: EntityId) -> EcsError {
        EcsError::ComponentNotFound {
            entity: id,
            component: std::any::type_name::<T>(),
        }
    }
}

impl<T: Component> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for ComponentPool<T> {
    fn contains(&self, id: EntityId) -> bool {
        self.has(id)
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.remove(id).is_some()
    }

    fn live_ids(&self) -> &[EntityId] {
        &self.slot_to_entity
    }

    fn live_count(&self) -> usize {
        self.len()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn clear_all(&mut self) {
        self.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
