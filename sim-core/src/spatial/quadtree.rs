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
//! Region quadtree over entity bounds
//!
//! The tree does not track movement: callers remove an entity with the
//! bounds it was inserted with and re-insert it with its new bounds.
//!
//! Routing is by exact containment. A rectangle descends into a child only
//! if it lies strictly inside one quadrant relative to the node midpoint;
//! anything straddling a midpoint stays at the current node. Because
//! [`QuadTree::remove`] follows the same rule, removal needs no
//! entity-to-node back-pointer.

use crate::ecs::Entity;
use crate::spatial::Rect;

/// Configuration for quadtree splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeConfig {
    /// A node splits once it holds more than this many entries
    pub max_entries: usize,
    /// Nodes at this level never split
    pub max_levels: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        QuadTreeConfig {
            max_entries: 10,
            max_levels: 5,
        }
    }
}

impl QuadTreeConfig {
    /// Create a new quadtree configuration
    pub fn new(max_entries: usize, max_levels: u32) -> Self {
        QuadTreeConfig::default()
            .with_max_entries(max_entries)
            .with_max_levels(max_levels)
    }

    /// Shallower tree used by the collision system
    pub fn for_collision() -> Self {
        QuadTreeConfig::default().with_max_levels(4)
    }

    /// Set the split threshold
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        assert!(max_entries > 0, "Split threshold must be at least 1");
        self.max_entries = max_entries;
        self
    }

    /// Set the maximum depth
    pub fn with_max_levels(mut self, max_levels: u32) -> Self {
        self.max_levels = max_levels;
        self
    }
}

/// Child slots, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

/// Pick the child quadrant that strictly contains `rect`, if any
fn quadrant_of(bounds: &Rect, rect: &Rect) -> Option<Quadrant> {
    let vertical_mid = bounds.x + bounds.width / 2.0;
    let horizontal_mid = bounds.y + bounds.height / 2.0;

    let top = rect.y < horizontal_mid && rect.bottom() < horizontal_mid;
    let bottom = rect.y > horizontal_mid;

    if rect.x < vertical_mid && rect.right() < vertical_mid {
        if top {
            return Some(Quadrant::TopLeft);
        }
        if bottom {
            return Some(Quadrant::BottomLeft);
        }
    } else if rect.x > vertical_mid {
        if top {
            return Some(Quadrant::TopRight);
        }
        if bottom {
            return Some(Quadrant::BottomRight);
        }
    }
    None
}

struct Node {
    bounds: Rect,
    level: u32,
    entries: Vec<(Entity, Rect)>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect, level: u32) -> Self {
        Node {
            bounds,
            level,
            entries: Vec::new(),
            children: None,
        }
    }

    fn split(bounds: Rect, level: u32) -> Box<[Node; 4]> {
        let half_w = bounds.width / 2.0;
        let half_h = bounds.height / 2.0;
        let (x, y) = (bounds.x, bounds.y);
        let next = level + 1;
        log::trace!("quadtree split at level {} ({:?})", level, bounds);
        Box::new([
            Node::new(Rect::new(x + half_w, y, half_w, half_h), next),
            Node::new(Rect::new(x, y, half_w, half_h), next),
            Node::new(Rect::new(x, y + half_h, half_w, half_h), next),
            Node::new(Rect::new(x + half_w, y + half_h, half_w, half_h), next),
        ])
    }

    fn insert(&mut self, config: &QuadTreeConfig, entity: Entity, rect: Rect) {
        let quadrant = quadrant_of(&self.bounds, &rect);
        if let (Some(children), Some(q)) = (self.children.as_mut(), quadrant) {
            children[q as usize].insert(config, entity, rect);
            return;
        }

        self.entries.push((entity, rect));
        if self.entries.len() <= config.max_entries || self.level >= config.max_levels {
            return;
        }

        let (bounds, level) = (self.bounds, self.level);
        let children = self
            .children
            .get_or_insert_with(|| Node::split(bounds, level));
        let entries = std::mem::take(&mut self.entries);
        for (entity, rect) in entries {
            match quadrant_of(&bounds, &rect) {
                Some(q) => children[q as usize].insert(config, entity, rect),
                None => self.entries.push((entity, rect)),
            }
        }
    }

    fn remove(&mut self, entity: Entity, rect: &Rect) -> bool {
        let quadrant = quadrant_of(&self.bounds, rect);
        if let (Some(children), Some(q)) = (self.children.as_mut(), quadrant) {
            return children[q as usize].remove(entity, rect);
        }

        match self.entries.iter().position(|(e, _)| *e == entity) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    fn retrieve(&self, found: &mut Vec<Entity>, query: &Rect) {
        for (entity, rect) in &self.entries {
            if rect.intersects(query) && !found.contains(entity) {
                found.push(*entity);
            }
        }

        if let Some(children) = &self.children {
            match quadrant_of(&self.bounds, query) {
                Some(q) => children[q as usize].retrieve(found, query),
                None => {
                    for child in children.iter() {
                        child.retrieve(found, query);
                    }
                }
            }
        }
    }

    fn len(&self) -> usize {
        let below = self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(Node::len).sum());
        self.entries.len() + below
    }

    fn depth(&self) -> u32 {
        match &self.children {
            Some(children) => children.iter().map(Node::depth).max().unwrap_or(self.level),
            None => self.level,
        }
    }
}

/// Broad-phase spatial index keyed by entity
///
/// # Example
///
/// ```
/// use sim_core::ecs::World;
/// use sim_core::spatial::{QuadTree, Rect};
///
/// let mut world = World::new();
/// let entity = world.create_entity();
///
/// let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 640.0, 480.0));
/// let bounds = Rect::new(10.0, 10.0, 16.0, 16.0);
/// tree.insert(entity, bounds);
///
/// let mut nearby = Vec::new();
/// tree.retrieve(&mut nearby, &Rect::new(0.0, 0.0, 32.0, 32.0));
/// assert_eq!(nearby, vec![entity]);
///
/// assert!(tree.remove(entity, bounds));
/// assert!(tree.is_empty());
/// ```
pub struct QuadTree {
    config: QuadTreeConfig,
    root: Node,
}

impl QuadTree {
    /// Create an empty tree covering `bounds` with the default configuration
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, QuadTreeConfig::default())
    }

    /// Create an empty tree covering `bounds`
    pub fn with_config(bounds: Rect, config: QuadTreeConfig) -> Self {
        QuadTree {
            config,
            root: Node::new(bounds, 0),
        }
    }

    /// Insert an entity with its current bounds
    pub fn insert(&mut self, entity: Entity, bounds: Rect) {
        self.root.insert(&self.config, entity, bounds);
    }

    /// Remove an entity, routing by the bounds it was last inserted with
    ///
    /// Returns whether an entry was removed. Passing bounds other than the
    /// inserted ones may route to the wrong node and return `false`.
    pub fn remove(&mut self, entity: Entity, bounds: Rect) -> bool {
        self.root.remove(entity, &bounds)
    }

    /// Append every entity whose bounds intersect `query` to `found`
    ///
    /// Entities already in `found` are not appended again. Empty regions
    /// simply add nothing.
    pub fn retrieve(&self, found: &mut Vec<Entity>, query: &Rect) {
        self.root.retrieve(found, query);
    }

    /// Collect the entities whose bounds intersect `query`
    pub fn query(&self, query: &Rect) -> Vec<Entity> {
        let mut found = Vec::new();
        self.retrieve(&mut found, query);
        found
    }

    /// Drop every entry and child node
    pub fn clear(&mut self) {
        self.root = Node::new(self.root.bounds, 0);
    }

    /// Total number of entries in the tree
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Check if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Area covered by the root node
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Level of the deepest node currently allocated (0 for an unsplit root)
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// The configuration this tree splits with
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }
}
