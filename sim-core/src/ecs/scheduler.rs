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
//! Fixed-timestep tick scheduler
//!
//! One tick runs every update system in registration order, then flushes the
//! world's pending destructions, then runs every draw system. Systems see the
//! scene exactly as the previous system left it.

use crate::ecs::{DrawSystem, System};
use crate::error::Result;
use crate::scene::Scene;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Sequence number of the tick, starting at 1
    pub tick: u64,
    /// Entities purged by the end-of-tick flush
    pub purged: usize,
}

/// Ordered list of update and draw systems
///
/// # Examples
///
/// ```
/// use sim_core::ecs::{Scheduler, System};
/// use sim_core::error::Result;
/// use sim_core::scene::Scene;
/// use sim_core::spatial::Rect;
///
/// struct Reaper;
/// impl System for Reaper {
///     fn run(&mut self, scene: &mut Scene, _dt: f64) -> Result<()> {
///         let doomed: Vec<_> = scene.world.entities().collect();
///         for entity in doomed {
///             scene.world.destroy_entity(entity);
///         }
///         Ok(())
///     }
/// }
///
/// let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
/// scene.world.create_entity();
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(Reaper);
/// let summary = scheduler.tick(&mut scene, 1.0 / 60.0).unwrap();
/// assert_eq!(summary.purged, 1);
/// ```
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    draw_systems: Vec<Box<dyn DrawSystem>>,
    ticks: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Scheduler {
            systems: Vec::new(),
            draw_systems: Vec::new(),
            ticks: 0,
        }
    }

    /// Append an update system; it runs after every system added before it
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        log::debug!("registered system {}", system.name());
        self.systems.push(Box::new(system));
    }

    /// Append a draw system
    pub fn add_draw_system<D: DrawSystem + 'static>(&mut self, system: D) {
        log::debug!("registered draw system {}", system.name());
        self.draw_systems.push(Box::new(system));
    }

    /// Get the number of update systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Get the number of draw systems
    pub fn draw_system_count(&self) -> usize {
        self.draw_systems.len()
    }

    /// Number of ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick
    ///
    /// If an update system fails, the remaining systems, the flush and the
    /// draw systems are skipped and the error is returned. The tick is not
    /// counted.
    ///
    /// # Panics
    ///
    /// Panics if `delta_seconds` is negative, NaN or infinite.
    pub fn tick(&mut self, scene: &mut Scene, delta_seconds: f64) -> Result<TickSummary> {
        assert!(
            delta_seconds.is_finite() && delta_seconds >= 0.0,
            "Tick delta must be non-negative and finite"
        );

        for system in &mut self.systems {
            if let Err(err) = system.run(scene, delta_seconds) {
                log::error!("system {} failed: {}", system.name(), err);
                return Err(err);
            }
        }

        let purged = scene.world.flush_destroyed();

        for system in &mut self.draw_systems {
            system.draw(scene);
        }

        self.ticks += 1;
        Ok(TickSummary {
            tick: self.ticks,
            purged,
        })
    }

    /// Remove all systems; the tick counter is kept
    pub fn clear(&mut self) {
        self.systems.clear();
        self.draw_systems.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcsError;
    use crate::spatial::Rect;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl System for Recorder {
        fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
            self.log.lock().unwrap().push(format!(
                "{}:{}",
                self.name,
                scene.world.pending_destroy_count()
            ));
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct DrawRecorder(Log);

    impl DrawSystem for DrawRecorder {
        fn draw(&mut self, scene: &Scene) {
            self.0
                .lock()
                .unwrap()
                .push(format!("draw:{}", scene.world.pending_destroy_count()));
        }
    }

    struct DestroyAll;

    impl System for DestroyAll {
        fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
            let doomed: Vec<_> = scene.world.entities().collect();
            for entity in doomed {
                scene.world.destroy_entity(entity);
            }
            Ok(())
        }
    }

    struct Failing;

    impl System for Failing {
        fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
            let entity = scene.world.create_entity();
            scene.world.destroy_entity(entity);
            scene.world.get_component::<crate::ecs::components::Transform>(entity)?;
            Ok(())
        }
    }

    fn scene() -> Scene {
        Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn test_update_then_flush_then_draw() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut scene = scene();
        scene.world.create_entity();
        scene.world.create_entity();

        let mut scheduler = Scheduler::new();
        scheduler.add_draw_system(DrawRecorder(log.clone()));
        scheduler.add_system(Recorder { name: "first", log: log.clone() });
        scheduler.add_system(DestroyAll);
        scheduler.add_system(Recorder { name: "second", log: log.clone() });

        let summary = scheduler.tick(&mut scene, 0.5).unwrap();
        assert_eq!(summary, TickSummary { tick: 1, purged: 2 });
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:0", "second:2", "draw:0"]
        );
    }

    #[test]
    fn test_tick_counter() {
        let mut scheduler = Scheduler::new();
        let mut scene = scene();
        for expected in 1..=3 {
            assert_eq!(scheduler.tick(&mut scene, 0.0).unwrap().tick, expected);
        }
        assert_eq!(scheduler.ticks(), 3);
    }

    #[test]
    fn test_failing_system_aborts_tick() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut scene = scene();
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Failing);
        scheduler.add_system(Recorder { name: "after", log: log.clone() });
        scheduler.add_draw_system(DrawRecorder(log.clone()));

        let err = scheduler.tick(&mut scene, 0.1).unwrap_err();
        assert!(matches!(err, EcsError::InactiveEntity { .. }));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(scheduler.ticks(), 0);
        // the flush was skipped
        assert_eq!(scene.world.pending_destroy_count(), 1);
    }

    #[test]
    #[should_panic(expected = "Tick delta must be non-negative and finite")]
    fn test_negative_delta_panics() {
        let mut scheduler = Scheduler::new();
        scheduler.tick(&mut scene(), -1.0).ok();
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.add_system(DestroyAll);
        scheduler.add_draw_system(DrawRecorder(Arc::default()));
        assert_eq!(scheduler.system_count(), 1);
        assert_eq!(scheduler.draw_system_count(), 1);

        scheduler.clear();
        assert_eq!(scheduler.system_count(), 0);
        assert_eq!(scheduler.draw_system_count(), 0);
    }
}
