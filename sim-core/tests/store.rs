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
//! Entity store behaviour through the public API

use sim_core::ecs::components::{Collider, Health, ProposedPosition, Transform, Velocity};
use sim_core::ecs::Component;
use sim_core::{EcsError, World};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tag(u32);
impl Component for Tag {}

#[test]
fn test_destroyed_entity_leaves_queries_before_flush() {
    let mut world = World::new();
    let a = world.create_entity();
    let b = world.create_entity();
    world.add_component(a, Transform::new(1.0, 1.0)).unwrap();
    world.add_component(b, Transform::new(2.0, 2.0)).unwrap();

    assert!(world.destroy_entity(a));

    let seen: Vec<_> = world.query::<(Transform,)>().collect();
    assert_eq!(seen, vec![b]);
    assert!(world.is_pending_destroy(a));

    // storage is only purged at the flush
    let pool = world.pool::<Transform>().unwrap();
    assert!(pool.has(a.id()));
    assert_eq!(pool.len(), 2);

    assert_eq!(world.flush_destroyed(), 1);
    assert!(!world.pool::<Transform>().unwrap().has(a.id()));
    assert!(!world.is_pending_destroy(a));
    assert_eq!(world.flush_destroyed(), 0);
}

#[test]
fn test_destroyed_entity_rejects_component_access() {
    let mut world = World::new();
    let e = world.create_entity();
    world.add_component(e, Health::new(3)).unwrap();
    world.destroy_entity(e);

    assert_eq!(
        world.get_component::<Health>(e).unwrap_err(),
        EcsError::InactiveEntity { entity: e.id() }
    );
    assert!(matches!(
        world.add_component(e, Tag(1)),
        Err(EcsError::InactiveEntity { .. })
    ));
    assert!(!world.has_component::<Health>(e));
    assert_eq!(world.remove_component::<Health>(e), None);
    assert!(!world.destroy_entity(e));
}

#[test]
fn test_four_kind_query() {
    let mut world = World::new();
    let mut full = HashSet::new();

    for i in 0..40u32 {
        let e = world.create_entity();
        world.add_component(e, Transform::new(i as f64, 0.0)).unwrap();
        if i % 2 == 0 {
            world.add_component(e, Velocity::new(1.0, 0.0)).unwrap();
        }
        if i % 3 == 0 {
            world.add_component(e, Collider::dynamic(1.0, 1.0)).unwrap();
        }
        if i % 5 == 0 {
            world.add_component(e, Tag(i)).unwrap();
        }
        if i % 30 == 0 {
            full.insert(e);
        }
    }

    let found: HashSet<_> = world
        .query::<(Transform, Velocity, Collider, Tag)>()
        .collect();
    assert_eq!(found, full);
    assert_eq!(found.len(), 2);
}

#[test]
fn test_query_yields_each_entity_once_after_churn() {
    let mut world = World::new();
    let entities: Vec<_> = (0..100).map(|_| world.create_entity()).collect();
    for (i, &e) in entities.iter().enumerate() {
        world.add_component(e, Tag(i as u32)).unwrap();
        world.add_component(e, ProposedPosition::new(0.0, 0.0)).unwrap();
    }
    for &e in entities.iter().step_by(3) {
        world.remove_component::<Tag>(e);
    }
    for &e in entities.iter().skip(1).step_by(7) {
        world.destroy_entity(e);
    }
    world.flush_destroyed();

    let mut seen = HashSet::new();
    for e in world.query::<(ProposedPosition, Tag)>() {
        assert!(seen.insert(e), "entity yielded twice");
        let tag = world.get_component::<Tag>(e).unwrap();
        assert_eq!(entities[tag.0 as usize], e);
    }

    let expected = entities
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 0 && (i % 7 != 1))
        .count();
    assert_eq!(seen.len(), expected);

    let pool = world.pool::<Tag>().unwrap();
    assert_eq!(pool.entity_ids().count(), pool.len());
    for id in pool.entity_ids() {
        assert!(pool.slot_of(id).unwrap() < pool.len());
    }
}

#[test]
fn test_in_place_mutation() {
    let mut world = World::new();
    let e = world.create_entity();
    world.add_component(e, Health::new(20)).unwrap();

    let dead = world
        .with_component_mut(e, |hp: &mut Health| hp.apply_damage(20))
        .unwrap();
    assert!(dead);
    assert_eq!(world.get_component::<Health>(e).unwrap().current, 0);

    world.get_component_mut::<Health>(e).unwrap().current = 7;
    assert_eq!(world.get_component::<Health>(e).unwrap().current, 7);
}

#[test]
fn test_worlds_do_not_share_handles() {
    let mut first = World::new();
    let mut second = World::new();
    let a = first.create_entity();
    let b = second.create_entity();

    assert_eq!(a.id(), b.id());
    assert_ne!(a, b);
    assert!(!second.is_alive(a));
    assert!(!second.destroy_entity(a));
    assert!(second.is_alive(b));
}
