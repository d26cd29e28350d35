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
//! Arena Example
//!
//! A turret in the middle of a walled arena fires at enemies that wander
//! toward it. It showcases:
//!
//! - Spawning collidables into a scene (world + quadtree)
//! - Movement proposing positions and the collision pass committing them
//! - Projectile hits, kills and deferred destruction
//! - Terrain solidity supplied as a closure
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=info cargo run --example arena
//!
//! # More enemies, longer run
//! RUST_LOG=debug cargo run --example arena -- --enemies 40 --ticks 600
//! ```

use sim_core::collision::{CollisionConfig, CollisionSystem};
use sim_core::ecs::components::categories::{ALL, ENEMY, PLAYER, PROJECTILE, WALL};
use sim_core::ecs::components::{
    Collider, CollisionFilter, Health, ProposedPosition, Transform, Velocity,
};
use sim_core::ecs::systems::MovementSystem;
use sim_core::ecs::{DrawSystem, Scheduler, System};
use sim_core::spatial::Rect;
use sim_core::{Entity, Result, Scene};

const ARENA: f64 = 800.0;
const WALL_THICKNESS: f64 = 16.0;
const TIMESTEP: f64 = 1.0 / 60.0;
const PROJECTILE_SPEED: f64 = 400.0;
const FIRE_INTERVAL: u32 = 10;

/// Linear congruential generator for reproducible layouts
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

struct ArenaConfig {
    enemies: usize,
    ticks: u64,
    seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            enemies: 12,
            ticks: 300,
            seed: 7,
        }
    }
}

/// Steers every enemy toward the turret
struct ChaseSystem {
    target: (f64, f64),
    speed: f64,
}

impl System for ChaseSystem {
    fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
        let hunters: Vec<Entity> = scene
            .world
            .query::<(Transform, Velocity, Health)>()
            .collect();
        for entity in hunters {
            let t = *scene.world.get_component::<Transform>(entity)?;
            let (dx, dy) = (self.target.0 - t.x(), self.target.1 - t.y());
            let len = dx.hypot(dy).max(1.0);
            let velocity = scene.world.get_component_mut::<Velocity>(entity)?;
            velocity.dx = dx / len * self.speed;
            velocity.dy = dy / len * self.speed;
        }
        Ok(())
    }
}

/// Fires a projectile at the nearest enemy every few ticks
struct TurretSystem {
    origin: (f64, f64),
    cooldown: u32,
}

impl System for TurretSystem {
    fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return Ok(());
        }

        let (ox, oy) = self.origin;
        let nearest = scene
            .world
            .query::<(Transform, Health)>()
            .filter_map(|e| scene.world.get_component::<Transform>(e).ok().map(|t| (t.x(), t.y())))
            .min_by(|a, b| {
                let da = (a.0 - ox).hypot(a.1 - oy);
                let db = (b.0 - ox).hypot(b.1 - oy);
                da.total_cmp(&db)
            });
        let Some((tx, ty)) = nearest else {
            return Ok(());
        };

        let (dx, dy) = (tx + 8.0 - ox, ty + 8.0 - oy);
        let len = dx.hypot(dy).max(1.0);
        let filter = CollisionFilter::new(PROJECTILE, ENEMY);
        // spawn just outside the turret's own box
        let start = Transform::new(ox + dx / len * 30.0, oy + dy / len * 30.0);
        let shot = scene.spawn_collidable(start, Collider::dynamic(4.0, 4.0), filter)?;
        scene.world.add_component(
            shot,
            Velocity::new(dx / len * PROJECTILE_SPEED, dy / len * PROJECTILE_SPEED),
        )?;

        self.cooldown = FIRE_INTERVAL;
        Ok(())
    }
}

/// Removes projectiles whose move was rejected (walls, turret, pond)
struct CleanupSystem;

impl System for CleanupSystem {
    fn run(&mut self, scene: &mut Scene, _delta_seconds: f64) -> Result<()> {
        let shots: Vec<Entity> = scene
            .world
            .query::<(Transform, ProposedPosition, Velocity)>()
            .filter(|&e| !scene.world.has_component::<Health>(e))
            .collect();
        for entity in shots {
            let t = *scene.world.get_component::<Transform>(entity)?;
            let p = *scene.world.get_component::<ProposedPosition>(entity)?;
            if t.x() != p.x || t.y() != p.y {
                scene.despawn(entity);
            }
        }
        Ok(())
    }
}

/// Prints a status line once per simulated second
struct StatusPrinter {
    frame: u64,
}

impl DrawSystem for StatusPrinter {
    fn draw(&mut self, scene: &Scene) {
        self.frame += 1;
        if self.frame % 60 != 0 {
            return;
        }
        let enemies = scene.world.query::<(Health,)>().count();
        println!(
            "t={:>5.1}s  entities={:>4}  enemies={:>3}  indexed={:>4}  depth={}",
            self.frame as f64 * TIMESTEP,
            scene.world.entity_count(),
            enemies,
            scene.spatial.len(),
            scene.spatial.depth()
        );
    }
}

fn parse_args() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--enemies", Some(v)) => match v.parse() {
                Ok(n) => config.enemies = n,
                Err(_) => eprintln!("Invalid enemy count: {}", v),
            },
            ("--ticks", Some(v)) => match v.parse() {
                Ok(n) => config.ticks = n,
                Err(_) => eprintln!("Invalid tick count: {}", v),
            },
            ("--seed", Some(v)) => match v.parse() {
                Ok(n) => config.seed = n,
                Err(_) => eprintln!("Invalid seed: {}", v),
            },
            (flag, _) => eprintln!("Ignoring argument: {}", flag),
        }
        i += 2;
    }
    config
}

fn build_scene(config: &ArenaConfig) -> Result<Scene> {
    let mut scene = Scene::new(Rect::new(0.0, 0.0, ARENA, ARENA));
    let wall = CollisionFilter::new(WALL, ALL);
    let edges = [
        (0.0, 0.0, ARENA, WALL_THICKNESS),
        (0.0, ARENA - WALL_THICKNESS, ARENA, WALL_THICKNESS),
        (0.0, 0.0, WALL_THICKNESS, ARENA),
        (ARENA - WALL_THICKNESS, 0.0, WALL_THICKNESS, ARENA),
    ];
    for (x, y, w, h) in edges {
        scene.spawn_collidable(Transform::new(x, y), Collider::fixed(w, h), wall)?;
    }

    let center = ARENA / 2.0;
    let turret = CollisionFilter::new(PLAYER, ENEMY);
    scene.spawn_collidable(
        Transform::new(center - 16.0, center - 16.0),
        Collider::fixed(32.0, 32.0),
        turret,
    )?;

    let mut rng = SimpleRng::new(config.seed);
    let enemy = CollisionFilter::new(ENEMY, PLAYER | PROJECTILE | ENEMY);
    for _ in 0..config.enemies {
        let x = rng.range(WALL_THICKNESS + 4.0, ARENA - WALL_THICKNESS - 20.0);
        let y = rng.range(WALL_THICKNESS + 4.0, 120.0);
        let e = scene.spawn_collidable(Transform::new(x, y), Collider::dynamic(16.0, 16.0), enemy)?;
        scene.world.add_component(e, Velocity::default())?;
        scene.world.add_component(e, Health::new(30))?;
    }
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::init();
    let config = parse_args();

    println!("=== Arena ===");
    println!("enemies: {}  ticks: {}  seed: {}", config.enemies, config.ticks, config.seed);
    println!();

    let mut scene = build_scene(&config)?;
    let center = ARENA / 2.0;

    // a pond in the lower half that nothing can cross
    let pond = Rect::new(300.0, 560.0, 200.0, 80.0);
    let collisions = CollisionSystem::with_terrain(CollisionConfig::default(), move |b: &Rect| {
        b.intersects(&pond)
    });

    let mut scheduler = Scheduler::new();
    scheduler.add_system(ChaseSystem {
        target: (center - 8.0, center - 8.0),
        speed: 40.0,
    });
    scheduler.add_system(TurretSystem {
        origin: (center, center),
        cooldown: 0,
    });
    scheduler.add_system(MovementSystem::new());
    scheduler.add_system(collisions);
    scheduler.add_system(CleanupSystem);
    scheduler.add_draw_system(StatusPrinter { frame: 0 });

    let mut purged = 0;
    for _ in 0..config.ticks {
        purged += scheduler.tick(&mut scene, TIMESTEP)?.purged;
        if scene.world.query::<(Health,)>().next().is_none() {
            break;
        }
    }

    println!();
    println!("ticks run:       {}", scheduler.ticks());
    println!("entities purged: {}", purged);
    println!("enemies left:    {}", scene.world.query::<(Health,)>().count());
    Ok(())
}
