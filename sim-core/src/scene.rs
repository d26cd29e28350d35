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
//! Scene: one world paired with one spatial index
//!
//! Collidable entities must be in both. The helpers here keep the two in
//! step at spawn and despawn time; movement is synced by the collision pass.

use crate::ecs::components::{Collider, CollisionFilter, Transform};
use crate::ecs::{Entity, World};
use crate::error::Result;
use crate::spatial::{QuadTree, QuadTreeConfig, Rect};

/// Runtime state of one simulated level
pub struct Scene {
    /// Entity and component store
    pub world: World,
    /// Broad-phase index over collider bounds
    pub spatial: QuadTree,
}

impl Scene {
    /// Create an empty scene whose index covers `bounds`
    ///
    /// The index uses [`QuadTreeConfig::for_collision`].
    pub fn new(bounds: Rect) -> Self {
        Self::with_index_config(bounds, QuadTreeConfig::for_collision())
    }

    /// Create an empty scene with a custom index configuration
    pub fn with_index_config(bounds: Rect, config: QuadTreeConfig) -> Self {
        Scene {
            world: World::new(),
            spatial: QuadTree::with_config(bounds, config),
        }
    }

    /// Create an entity with a transform, collider and filter, and index it
    pub fn spawn_collidable(
        &mut self,
        transform: Transform,
        collider: Collider,
        filter: CollisionFilter,
    ) -> Result<Entity> {
        let entity = self.world.create_entity();
        self.world.add_component(entity, transform)?;
        self.world.add_component(entity, collider)?;
        self.world.add_component(entity, filter)?;
        self.spatial
            .insert(entity, collider.bounds_at(transform.x(), transform.y()));
        Ok(entity)
    }

    /// Current collider bounds of an active entity
    pub fn bounds_of(&self, entity: Entity) -> Option<Rect> {
        let collider = self.world.get_component::<Collider>(entity).ok()?;
        let transform = self.world.get_component::<Transform>(entity).ok()?;
        Some(collider.bounds_at(transform.x(), transform.y()))
    }

    /// Take an entity out of the index and mark it destroyed
    ///
    /// Returns `false` if the entity was not active.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if let Some(bounds) = self.bounds_of(entity) {
            self.spatial.remove(entity, bounds);
        }
        self.world.destroy_entity(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::categories;

    #[test]
    fn test_spawn_and_despawn_keep_index_in_step() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let filter = CollisionFilter::new(categories::ENEMY, categories::PLAYER);
        let e = scene
            .spawn_collidable(Transform::new(10.0, 10.0), Collider::dynamic(5.0, 5.0), filter)
            .unwrap();

        assert_eq!(scene.spatial.len(), 1);
        assert_eq!(scene.bounds_of(e), Some(Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert_eq!(scene.world.get_component::<CollisionFilter>(e).unwrap(), &filter);

        assert!(scene.despawn(e));
        assert!(scene.spatial.is_empty());
        assert!(!scene.despawn(e));
        assert_eq!(scene.world.flush_destroyed(), 1);
    }
}
