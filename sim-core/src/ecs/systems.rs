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
//! Built-in gameplay systems
//!
//! Movement turns velocities into proposed positions. It never touches
//! [`Transform`] directly: the collision pass decides what gets committed.

use crate::ecs::components::{ProposedPosition, Transform, Velocity};
use crate::ecs::{Entity, System};
use crate::error::Result;
use crate::scene::Scene;

/// Writes `ProposedPosition = Transform + Velocity * dt` for every entity
/// carrying both a [`Transform`] and a [`Velocity`]
///
/// Entities whose proposal would be NaN or infinite are skipped (their
/// previous proposal, if any, is left alone) and a warning is logged.
#[derive(Debug, Default)]
pub struct MovementSystem {
    movers: Vec<Entity>,
    last_moved: usize,
}

impl MovementSystem {
    /// Create a new movement system
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of proposals written by the last run
    pub fn last_moved(&self) -> usize {
        self.last_moved
    }
}

impl System for MovementSystem {
    fn run(&mut self, scene: &mut Scene, delta_seconds: f64) -> Result<()> {
        self.movers.clear();
        self.movers
            .extend(scene.world.query::<(Transform, Velocity)>());

        let mut moved = 0;
        for &entity in &self.movers {
            let transform = *scene.world.get_component::<Transform>(entity)?;
            let velocity = *scene.world.get_component::<Velocity>(entity)?;

            let proposed = ProposedPosition::new(
                transform.x() + velocity.dx * delta_seconds,
                transform.y() + velocity.dy * delta_seconds,
            );
            if !proposed.x.is_finite() || !proposed.y.is_finite() {
                log::warn!(
                    "movement produced invalid position for entity {}, skipping",
                    entity.id()
                );
                continue;
            }

            scene.world.add_component(entity, proposed)?;
            moved += 1;
        }

        self.last_moved = moved;
        Ok(())
    }

    fn name(&self) -> &str {
        "movement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Rect;

    fn scene() -> Scene {
        Scene::new(Rect::new(0.0, 0.0, 1000.0, 1000.0))
    }

    #[test]
    fn test_proposes_without_committing() {
        let mut scene = scene();
        let e = scene.world.create_entity();
        scene.world.add_component(e, Transform::new(10.0, 20.0)).unwrap();
        scene.world.add_component(e, Velocity::new(4.0, -2.0)).unwrap();

        let mut movement = MovementSystem::new();
        movement.run(&mut scene, 0.5).unwrap();

        assert_eq!(
            *scene.world.get_component::<ProposedPosition>(e).unwrap(),
            ProposedPosition::new(12.0, 19.0)
        );
        assert_eq!(
            *scene.world.get_component::<Transform>(e).unwrap(),
            Transform::new(10.0, 20.0)
        );
        assert_eq!(movement.last_moved(), 1);
    }

    #[test]
    fn test_ignores_entities_without_velocity() {
        let mut scene = scene();
        let still = scene.world.create_entity();
        scene.world.add_component(still, Transform::new(1.0, 1.0)).unwrap();

        MovementSystem::new().run(&mut scene, 1.0).unwrap();
        assert!(!scene.world.has_component::<ProposedPosition>(still));
    }

    #[test]
    fn test_skips_invalid_results() {
        let mut scene = scene();
        let e = scene.world.create_entity();
        scene.world.add_component(e, Transform::new(0.0, 0.0)).unwrap();
        scene.world.add_component(e, Velocity::new(f64::INFINITY, 0.0)).unwrap();

        let mut movement = MovementSystem::new();
        movement.run(&mut scene, 1.0).unwrap();
        assert_eq!(movement.last_moved(), 0);
        assert!(!scene.world.has_component::<ProposedPosition>(e));
    }

    #[test]
    fn test_skips_destroyed_entities() {
        let mut scene = scene();
        let e = scene.world.create_entity();
        scene.world.add_component(e, Transform::new(0.0, 0.0)).unwrap();
        scene.world.add_component(e, Velocity::new(1.0, 1.0)).unwrap();
        scene.world.destroy_entity(e);

        let mut movement = MovementSystem::new();
        movement.run(&mut scene, 1.0).unwrap();
        assert_eq!(movement.last_moved(), 0);
    }
}
