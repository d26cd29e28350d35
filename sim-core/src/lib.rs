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
//! # Sim Core
//!
//! Entity store, quadtree spatial index and collision resolution for 2D
//! tick-driven simulations.
//!
//! ## Features
//!
//! - **ECS storage**: dense per-kind component pools with O(1) add/remove
//! - **Deferred destruction**: entities leave queries at once and are purged at the end of a tick
//! - **Spatial index**: bounds-routed quadtree for broad-phase proximity queries
//! - **Collision pass**: static blockers, category/mask filtering, projectile hits and terrain vetoes
//! - **Parallelization**: optional Rayon precomputation in the collision pass
//!
//! ## Example
//!
//! ```rust
//! use sim_core::collision::CollisionSystem;
//! use sim_core::ecs::components::{categories, Collider, CollisionFilter, Transform, Velocity};
//! use sim_core::ecs::systems::MovementSystem;
//! use sim_core::ecs::Scheduler;
//! use sim_core::scene::Scene;
//! use sim_core::spatial::Rect;
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 640.0, 480.0));
//! let filter = CollisionFilter::new(categories::PLAYER, categories::ENEMY);
//! let player = scene
//!     .spawn_collidable(Transform::new(10.0, 10.0), Collider::dynamic(16.0, 16.0), filter)
//!     .unwrap();
//! scene.world.add_component(player, Velocity::new(60.0, 0.0)).unwrap();
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add_system(MovementSystem::new());
//! scheduler.add_system(CollisionSystem::default());
//! scheduler.tick(&mut scene, 0.5).unwrap();
//!
//! assert_eq!(scene.world.get_component::<Transform>(player).unwrap().x(), 40.0);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Spatial indexing
pub mod spatial;

/// Collision resolution
pub mod collision;

/// Error types
pub mod error;

/// World plus spatial index
pub mod scene;

pub use ecs::{Entity, World};
pub use error::{EcsError, Result};
pub use scene::Scene;
