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
//! Spatial index behaviour under movement and scene churn

use sim_core::ecs::components::{categories, Collider, CollisionFilter, ProposedPosition, Transform};
use sim_core::collision::CollisionSystem;
use sim_core::spatial::{QuadTree, QuadTreeConfig, Rect};
use sim_core::{Scene, World};

fn scatter(count: usize) -> Vec<(f64, f64)> {
    // deterministic pseudo-random layout
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let x = (state % 980) as f64;
            let y = ((state >> 20) % 980) as f64;
            (x, y)
        })
        .collect()
}

#[test]
fn test_every_entry_found_at_its_own_bounds() {
    let mut world = World::new();
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let entries: Vec<_> = scatter(300)
        .into_iter()
        .map(|(x, y)| (world.create_entity(), Rect::new(x, y, 12.0, 12.0)))
        .collect();
    for &(e, b) in &entries {
        tree.insert(e, b);
    }

    assert_eq!(tree.len(), 300);
    assert!(tree.depth() >= 1);
    assert!(tree.depth() <= QuadTreeConfig::default().max_levels);

    for &(e, b) in &entries {
        assert!(tree.query(&b).contains(&e));
    }

    let all = tree.query(&tree.bounds());
    assert_eq!(all.len(), 300);

    for &(e, b) in &entries {
        assert!(tree.remove(e, b));
    }
    assert!(tree.is_empty());
}

#[test]
fn test_remove_with_stale_bounds_misses() {
    let mut world = World::new();
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let e = world.create_entity();
    tree.insert(e, Rect::new(10.0, 10.0, 5.0, 5.0));

    // once split, bounds in another quadrant route elsewhere
    for _ in 0..10 {
        tree.insert(world.create_entity(), Rect::new(70.0, 70.0, 5.0, 5.0));
    }
    assert!(!tree.remove(e, Rect::new(80.0, 80.0, 5.0, 5.0)));
    assert!(tree.remove(e, Rect::new(10.0, 10.0, 5.0, 5.0)));
    assert!(!tree.remove(e, Rect::new(10.0, 10.0, 5.0, 5.0)));
}

#[test]
fn test_index_tracks_movers_across_passes() {
    let mut scene = Scene::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let filter = CollisionFilter::new(categories::PLAYER, 0);
    let movers: Vec<_> = scatter(120)
        .into_iter()
        .map(|(x, y)| {
            scene
                .spawn_collidable(Transform::new(x, y), Collider::dynamic(8.0, 8.0), filter)
                .unwrap()
        })
        .collect();

    let mut collisions = CollisionSystem::default();
    for step in 1..=5 {
        for &e in &movers {
            let t = *scene.world.get_component::<Transform>(e).unwrap();
            let (x, y) = ((t.x() + 3.0 * step as f64) % 990.0, t.y());
            scene.world.add_component(e, ProposedPosition::new(x, y)).unwrap();
        }
        let report = collisions.resolve(&mut scene).unwrap();
        assert_eq!(report.committed, movers.len());
    }

    assert_eq!(scene.spatial.len(), movers.len());
    for &e in &movers {
        let bounds = scene.bounds_of(e).unwrap();
        assert!(scene.spatial.query(&bounds).contains(&e));
    }

    for &e in movers.iter().take(20) {
        assert!(scene.despawn(e));
    }
    assert_eq!(scene.spatial.len(), movers.len() - 20);
    assert_eq!(scene.world.flush_destroyed(), 20);
}

#[test]
fn test_collision_depth_cap() {
    let mut world = World::new();
    let mut tree = QuadTree::with_config(
        Rect::new(0.0, 0.0, 1024.0, 1024.0),
        QuadTreeConfig::for_collision(),
    );
    for _ in 0..200 {
        tree.insert(world.create_entity(), Rect::new(1.0, 1.0, 0.5, 0.5));
    }
    assert_eq!(tree.depth(), 4);
    assert_eq!(tree.query(&Rect::new(0.0, 0.0, 2.0, 2.0)).len(), 200);
}
