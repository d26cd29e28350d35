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
//! Entity Component System core
//!
//! This module provides:
//! - Store-scoped entity handles
//! - Dense, swap-remove component pools behind a type-erased registry
//! - Multi-kind queries
//! - Update/draw system traits and the tick scheduler

mod component;
mod entity;
mod query;
mod scheduler;
mod system;
mod world;

/// Gameplay components used by movement and collision
pub mod components;

/// Built-in systems
pub mod systems;

pub use component::{Component, ComponentPool, ComponentStorage};
pub use entity::{Entity, EntityId, StoreId};
pub use query::{Query, QueryKinds};
pub use scheduler::{Scheduler, TickSummary};
pub use system::{DrawSystem, System};
pub use world::World;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_entity_creation() {
        let mut world = World::new();
        let entity = world.create_entity();
        assert_eq!(world.entity_count(), 1);
        assert!(world.is_alive(entity));
    }
}
