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
//! Entity management
//!
//! Entities are unique identifiers in the ECS that represent game objects.
//! They are lightweight handles that tie together components, scoped to the
//! [`World`](crate::ecs::World) that created them.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique identifier for an entity within one store
///
/// Ids are handed out by a monotonically increasing counter and are never
/// reused for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Create a new EntityId from a raw u64 value
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token identifying the store that issued an entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreId(u32);

static NEXT_STORE_ID: AtomicU32 = AtomicU32::new(1);

impl StoreId {
    /// Allocate a process-unique store token
    pub(crate) fn next() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u32 value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Entity handle bound to its owning store
///
/// Two handles are equal only when both the id and the store match, so a
/// handle minted by one world is never mistaken for an entity of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    store: StoreId,
    id: EntityId,
}

impl Entity {
    pub(crate) fn new(id: EntityId, store: StoreId) -> Self {
        Entity { store, id }
    }

    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get the token of the store that created this handle
    pub fn store(&self) -> StoreId {
        self.store
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, store: {})", self.id.0, self.store.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_accessors() {
        let store = StoreId::next();
        let entity = Entity::new(EntityId::new(42), store);
        assert_eq!(entity.id().raw(), 42);
        assert_eq!(entity.store(), store);
    }

    #[test]
    fn test_entity_equality_is_store_scoped() {
        let a = StoreId::next();
        let b = StoreId::next();
        assert_ne!(a, b);

        let e1 = Entity::new(EntityId::new(1), a);
        let e2 = Entity::new(EntityId::new(1), a);
        let e3 = Entity::new(EntityId::new(1), b);
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::new(7).to_string(), "#7");
    }
}
