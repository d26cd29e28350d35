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
//! Collision resolution pass
//!
//! Runs once per tick after gameplay systems have written
//! [`ProposedPosition`]s. For each mover, in ascending entity id order:
//!
//! 1. The spatial index shortlists candidates overlapping the proposed box.
//! 2. Candidates are ordered nearest-first (center distance, then id).
//! 3. Any overlapping static collider rejects the move outright.
//! 4. Dynamic candidates go through the category/mask filter. The nearest
//!    allowed pair involving a projectile is a hit: the other side takes
//!    damage, the projectile is consumed, and the pass moves on.
//! 5. Solid terrain rejects the move regardless of step 4.
//! 6. Surviving moves are committed to the [`Transform`] and re-indexed.
//!
//! Entities killed during the pass leave the index at once and are skipped
//! for the rest of it, so nothing dies twice in one tick.

use crate::collision::{OpenTerrain, TerrainSolidity};
use crate::ecs::components::{
    categories, Collider, CollisionFilter, Health, ProposedPosition, Transform,
};
use crate::ecs::{Entity, System, World};
use crate::error::Result;
use crate::scene::Scene;
use crate::spatial::Rect;

/// Hit points removed from the target of a projectile hit
pub const DEFAULT_PROJECTILE_DAMAGE: i32 = 10;

/// Side length of the box used for terrain checks on collider-less movers
pub const DEFAULT_FALLBACK_SIZE: f64 = 16.0;

/// Configuration for the collision pass
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionConfig {
    /// Category bits that mark an entity as a projectile
    pub projectile_category: u32,
    /// Damage dealt per projectile hit
    pub projectile_damage: i32,
    /// Width of the fallback box for movers without a collider
    pub fallback_width: f64,
    /// Height of the fallback box for movers without a collider
    pub fallback_height: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        CollisionConfig {
            projectile_category: categories::PROJECTILE,
            projectile_damage: DEFAULT_PROJECTILE_DAMAGE,
            fallback_width: DEFAULT_FALLBACK_SIZE,
            fallback_height: DEFAULT_FALLBACK_SIZE,
        }
    }
}

impl CollisionConfig {
    /// Set the category bits treated as projectiles
    pub fn with_projectile_category(mut self, category: u32) -> Self {
        self.projectile_category = category;
        self
    }

    /// Set the damage dealt per hit
    pub fn with_projectile_damage(mut self, damage: i32) -> Self {
        assert!(damage >= 0, "Projectile damage must be non-negative");
        self.projectile_damage = damage;
        self
    }

    /// Set the fallback box used for movers without a collider
    pub fn with_fallback_size(mut self, width: f64, height: f64) -> Self {
        assert!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "Fallback size must be positive and finite"
        );
        self.fallback_width = width;
        self.fallback_height = height;
        self
    }

    fn fallback_collider(&self) -> Collider {
        Collider::dynamic(self.fallback_width, self.fallback_height)
    }
}

/// Outcome counts of one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Moves committed to the transform
    pub committed: usize,
    /// Moves rejected by a static collider
    pub blocked_static: usize,
    /// Moves rejected by solid terrain
    pub blocked_terrain: usize,
    /// Projectile hits resolved
    pub hits: usize,
    /// Entities whose health reached zero
    pub kills: usize,
    /// Allowed overlaps between non-projectiles (no effect)
    pub contacts: usize,
}

impl CollisionReport {
    fn is_quiet(&self) -> bool {
        *self == CollisionReport::default()
    }
}

/// A mover's bounds, computed before resolution starts
#[derive(Debug, Clone, Copy)]
struct MovePlan {
    entity: Entity,
    collider: Option<Collider>,
    target: ProposedPosition,
    current: Rect,
    proposed: Rect,
}

/// A broad-phase candidate that survived the liveness checks
#[derive(Debug, Clone, Copy)]
struct Candidate {
    entity: Entity,
    collider: Collider,
    filter: CollisionFilter,
    bounds: Rect,
}

fn plan_move(world: &World, entity: Entity, config: &CollisionConfig) -> Result<MovePlan> {
    let transform = *world.get_component::<Transform>(entity)?;
    let target = *world.get_component::<ProposedPosition>(entity)?;
    let collider = if world.has_component::<Collider>(entity) {
        Some(*world.get_component::<Collider>(entity)?)
    } else {
        None
    };

    let shape = collider.unwrap_or_else(|| config.fallback_collider());
    Ok(MovePlan {
        entity,
        collider,
        target,
        current: shape.bounds_at(transform.x(), transform.y()),
        proposed: shape.bounds_at(target.x, target.y),
    })
}

#[cfg(feature = "parallel")]
fn plan_moves(world: &World, movers: &[Entity], config: &CollisionConfig) -> Result<Vec<MovePlan>> {
    use rayon::prelude::*;

    movers
        .par_iter()
        .map(|&entity| plan_move(world, entity, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn plan_moves(world: &World, movers: &[Entity], config: &CollisionConfig) -> Result<Vec<MovePlan>> {
    movers
        .iter()
        .map(|&entity| plan_move(world, entity, config))
        .collect()
}

/// System that resolves proposed movement against the spatial index
///
/// # Example
///
/// ```
/// use sim_core::collision::{CollisionConfig, CollisionSystem};
/// use sim_core::ecs::components::{categories, Collider, CollisionFilter, ProposedPosition, Transform};
/// use sim_core::scene::Scene;
/// use sim_core::spatial::Rect;
///
/// let mut scene = Scene::new(Rect::new(0.0, 0.0, 200.0, 200.0));
/// let wall = CollisionFilter::new(categories::WALL, categories::ALL);
/// scene.spawn_collidable(Transform::new(50.0, 0.0), Collider::fixed(10.0, 200.0), wall).unwrap();
///
/// let player = CollisionFilter::new(categories::PLAYER, categories::ENEMY);
/// let mover = scene.spawn_collidable(Transform::new(30.0, 10.0), Collider::dynamic(8.0, 8.0), player).unwrap();
/// scene.world.add_component(mover, ProposedPosition::new(45.0, 10.0)).unwrap();
///
/// let mut collisions = CollisionSystem::new(CollisionConfig::default());
/// let report = collisions.resolve(&mut scene).unwrap();
/// assert_eq!(report.blocked_static, 1);
/// assert_eq!(scene.world.get_component::<Transform>(mover).unwrap().x(), 30.0);
/// ```
pub struct CollisionSystem {
    config: CollisionConfig,
    terrain: Box<dyn TerrainSolidity>,
    broad_phase: Vec<Entity>,
    nearby: Vec<Candidate>,
    last_report: CollisionReport,
}

impl CollisionSystem {
    /// Create a collision system over open terrain
    pub fn new(config: CollisionConfig) -> Self {
        Self::with_terrain(config, OpenTerrain)
    }

    /// Create a collision system that also consults `terrain`
    pub fn with_terrain(config: CollisionConfig, terrain: impl TerrainSolidity + 'static) -> Self {
        CollisionSystem {
            config,
            terrain: Box::new(terrain),
            broad_phase: Vec::new(),
            nearby: Vec::new(),
            last_report: CollisionReport::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Outcome of the most recent pass
    pub fn last_report(&self) -> CollisionReport {
        self.last_report
    }

    /// Resolve every pending move in the scene
    pub fn resolve(&mut self, scene: &mut Scene) -> Result<CollisionReport> {
        let mut movers: Vec<Entity> = scene
            .world
            .query::<(ProposedPosition, Transform)>()
            .collect();
        movers.sort();

        let plans = plan_moves(&scene.world, &movers, &self.config)?;
        let mut report = CollisionReport::default();

        for plan in plans {
            // killed earlier in this pass
            if !scene.world.is_alive(plan.entity) {
                continue;
            }
            match plan.collider {
                Some(collider) => self.resolve_collider(scene, &plan, collider, &mut report)?,
                None => self.resolve_terrain_only(scene, &plan, &mut report)?,
            }
        }

        if !report.is_quiet() {
            log::debug!("collision pass: {:?}", report);
        }
        self.last_report = report;
        Ok(report)
    }

    fn resolve_terrain_only(
        &self,
        scene: &mut Scene,
        plan: &MovePlan,
        report: &mut CollisionReport,
    ) -> Result<()> {
        if self.terrain.is_solid(&plan.proposed) {
            report.blocked_terrain += 1;
            return Ok(());
        }
        scene
            .world
            .get_component_mut::<Transform>(plan.entity)?
            .set(plan.target.x, plan.target.y);
        report.committed += 1;
        Ok(())
    }

    fn resolve_collider(
        &mut self,
        scene: &mut Scene,
        plan: &MovePlan,
        collider: Collider,
        report: &mut CollisionReport,
    ) -> Result<()> {
        let filter = if scene.world.has_component::<CollisionFilter>(plan.entity) {
            *scene.world.get_component::<CollisionFilter>(plan.entity)?
        } else {
            CollisionFilter::none()
        };

        self.gather_candidates(scene, plan)?;

        if !collider.is_static()
            && self
                .nearby
                .iter()
                .any(|c| c.collider.is_static() && c.bounds.intersects(&plan.proposed))
        {
            report.blocked_static += 1;
            return Ok(());
        }

        let projectile = self.config.projectile_category;
        let mover_is_projectile = filter.is_in(projectile);
        let mut consumed = false;

        for i in 0..self.nearby.len() {
            let candidate = self.nearby[i];
            if candidate.collider.is_static()
                || !candidate.bounds.intersects(&plan.proposed)
                || !filter.should_collide(&candidate.filter)
            {
                continue;
            }

            let candidate_is_projectile = candidate.filter.is_in(projectile);
            match (mover_is_projectile, candidate_is_projectile) {
                (false, false) => {
                    report.contacts += 1;
                    continue;
                }
                (true, true) => {
                    self.remove_from_scene(scene, candidate.entity, candidate.bounds);
                    self.remove_from_scene(scene, plan.entity, plan.current);
                }
                (true, false) => {
                    self.damage(scene, candidate.entity, candidate.bounds, report)?;
                    self.remove_from_scene(scene, plan.entity, plan.current);
                }
                (false, true) => {
                    self.remove_from_scene(scene, candidate.entity, candidate.bounds);
                    self.damage(scene, plan.entity, plan.current, report)?;
                }
            }
            report.hits += 1;
            consumed = true;
            break;
        }

        if consumed {
            return Ok(());
        }
        if self.terrain.is_solid(&plan.proposed) {
            report.blocked_terrain += 1;
            return Ok(());
        }

        scene
            .world
            .get_component_mut::<Transform>(plan.entity)?
            .set(plan.target.x, plan.target.y);
        if !scene.spatial.remove(plan.entity, plan.current) {
            log::warn!(
                "entity {} moved but was not indexed at {:?}",
                plan.entity.id(),
                plan.current
            );
        }
        scene.spatial.insert(plan.entity, plan.proposed);
        report.committed += 1;
        Ok(())
    }

    /// Fill `nearby` with live candidates, nearest to the proposed box first
    fn gather_candidates(&mut self, scene: &Scene, plan: &MovePlan) -> Result<()> {
        self.broad_phase.clear();
        self.nearby.clear();
        scene.spatial.retrieve(&mut self.broad_phase, &plan.proposed);

        for &entity in &self.broad_phase {
            if entity == plan.entity
                || !scene.world.has_component::<Collider>(entity)
                || !scene.world.has_component::<Transform>(entity)
            {
                continue;
            }
            let collider = *scene.world.get_component::<Collider>(entity)?;
            let transform = scene.world.get_component::<Transform>(entity)?;
            let filter = if scene.world.has_component::<CollisionFilter>(entity) {
                *scene.world.get_component::<CollisionFilter>(entity)?
            } else {
                CollisionFilter::none()
            };
            self.nearby.push(Candidate {
                entity,
                collider,
                filter,
                bounds: collider.bounds_at(transform.x(), transform.y()),
            });
        }

        let target = plan.proposed;
        self.nearby.sort_by(|a, b| {
            target
                .center_distance_sq(&a.bounds)
                .total_cmp(&target.center_distance_sq(&b.bounds))
                .then_with(|| a.entity.cmp(&b.entity))
        });
        Ok(())
    }

    fn damage(
        &self,
        scene: &mut Scene,
        entity: Entity,
        bounds: Rect,
        report: &mut CollisionReport,
    ) -> Result<()> {
        if !scene.world.has_component::<Health>(entity) {
            return Ok(());
        }
        let damage = self.config.projectile_damage;
        let dead = scene
            .world
            .with_component_mut(entity, |health: &mut Health| health.apply_damage(damage))?;
        if dead {
            log::info!("entity {} destroyed by projectile hit", entity.id());
            self.remove_from_scene(scene, entity, bounds);
            report.kills += 1;
        }
        Ok(())
    }

    fn remove_from_scene(&self, scene: &mut Scene, entity: Entity, bounds: Rect) {
        scene.spatial.remove(entity, bounds);
        scene.world.destroy_entity(entity);
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl System for CollisionSystem {
    fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
        self.resolve(scene).map(|_| ())
    }

    fn name(&self) -> &str {
        "collision"
    }
}
