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
//! System traits
//!
//! Update systems mutate the scene once per tick, in registration order.
//! Draw systems run after the tick's destruction flush and only read.

use crate::error::Result;
use crate::scene::Scene;

/// Logic that runs once per tick against the scene
///
/// An error aborts the rest of the tick and is returned to the caller of
/// [`Scheduler::tick`](crate::ecs::Scheduler::tick).
pub trait System: Send + Sync {
    /// Execute the system; `delta_seconds` is the elapsed time for this tick
    fn run(&mut self, scene: &mut Scene, delta_seconds: f64) -> Result<()>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Read-only consumer of the scene, run at the end of each tick
pub trait DrawSystem: Send + Sync {
    /// Observe the scene
    fn draw(&mut self, scene: &Scene);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Rect;

    struct Spawner;

    impl System for Spawner {
        fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
            scene.world.create_entity();
            Ok(())
        }
    }

    struct Counter(usize);

    impl DrawSystem for Counter {
        fn draw(&mut self, scene: &Scene) {
            self.0 = scene.world.entity_count();
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert!(Spawner.name().ends_with("Spawner"));
        assert_eq!(Counter(0).name(), "counter");
    }

    #[test]
    fn test_draw_observes_updates() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut spawner = Spawner;
        let mut counter = Counter(0);

        spawner.run(&mut scene, 0.016).unwrap();
        spawner.run(&mut scene, 0.016).unwrap();
        counter.draw(&scene);
        assert_eq!(counter.0, 2);
    }
}
