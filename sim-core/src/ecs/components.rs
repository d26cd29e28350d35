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
//! Gameplay components consumed by the movement and collision systems
//!
//! Coordinates are 2D, in world units, with the origin at the top-left and
//! y growing downward.

use crate::ecs::Component;
use crate::spatial::Rect;

/// Committed 2D position of an entity
///
/// # Examples
///
/// ```
/// use sim_core::ecs::components::Transform;
///
/// let t = Transform::new(4.0, 2.0);
/// assert_eq!(t.x(), 4.0);
/// assert!(t.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    x: f64,
    y: f64,
}

impl Transform {
    /// Create a new transform at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Transform { x, y }
    }

    /// Get the x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move to the given coordinates
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Check if both coordinates are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Component for Transform {}

/// Position a gameplay system wants an entity to occupy after this tick
///
/// The collision pass decides whether the move is committed to the
/// entity's [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProposedPosition {
    /// Target x coordinate
    pub x: f64,
    /// Target y coordinate
    pub y: f64,
}

impl ProposedPosition {
    /// Create a new proposed position
    pub fn new(x: f64, y: f64) -> Self {
        ProposedPosition { x, y }
    }
}

impl Component for ProposedPosition {}

/// 2D velocity in world units per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    /// Horizontal speed
    pub dx: f64,
    /// Vertical speed
    pub dy: f64,
}

impl Velocity {
    /// Create a new velocity
    pub fn new(dx: f64, dy: f64) -> Self {
        Velocity { dx, dy }
    }

    /// Speed (magnitude of the velocity vector)
    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

impl Component for Velocity {}

/// Whether a collider moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// Never moves; blocks any mover that would overlap it
    Static,
    /// Moves and takes part in filtered interactions
    Dynamic,
}

/// Axis-aligned box shape attached to an entity
///
/// The box is given relative to the entity's position: its world bounds are
/// the shape translated by the current or proposed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Horizontal offset of the box from the entity position
    pub offset_x: f64,
    /// Vertical offset of the box from the entity position
    pub offset_y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Static or dynamic
    pub kind: ColliderKind,
}

impl Collider {
    /// Dynamic box anchored at the entity position
    pub fn dynamic(width: f64, height: f64) -> Self {
        Collider {
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
            kind: ColliderKind::Dynamic,
        }
    }

    /// Static box anchored at the entity position
    pub fn fixed(width: f64, height: f64) -> Self {
        Collider {
            kind: ColliderKind::Static,
            ..Collider::dynamic(width, height)
        }
    }

    /// Shift the box relative to the entity position
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Check if the collider never moves
    pub fn is_static(&self) -> bool {
        self.kind == ColliderKind::Static
    }

    /// World bounds of the box when the entity stands at `(x, y)`
    pub fn bounds_at(&self, x: f64, y: f64) -> Rect {
        Rect::new(x + self.offset_x, y + self.offset_y, self.width, self.height)
    }
}

impl Component for Collider {}

/// Category bits used by [`CollisionFilter`]
pub mod categories {
    /// Player-controlled entities
    pub const PLAYER: u32 = 1 << 0;
    /// Hostile entities
    pub const ENEMY: u32 = 1 << 1;
    /// Short-lived damaging entities, consumed on hit
    pub const PROJECTILE: u32 = 1 << 2;
    /// Level geometry
    pub const WALL: u32 = 1 << 3;
    /// Every category
    pub const ALL: u32 = u32::MAX;
}

/// Category/mask pair deciding which collidable groups interact
///
/// Two filters interact only when each side's mask accepts the other's
/// category. Masks need not be symmetric.
///
/// # Examples
///
/// ```
/// use sim_core::ecs::components::{categories, CollisionFilter};
///
/// let player = CollisionFilter::new(categories::PLAYER, categories::ENEMY | categories::PROJECTILE);
/// let enemy = CollisionFilter::new(categories::ENEMY, categories::PLAYER | categories::PROJECTILE);
/// assert!(player.should_collide(&enemy));
/// assert!(!player.should_collide(&player));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Groups this entity belongs to
    pub category: u32,
    /// Groups this entity accepts collisions from
    pub mask: u32,
}

impl CollisionFilter {
    /// Create a new filter
    pub fn new(category: u32, mask: u32) -> Self {
        CollisionFilter { category, mask }
    }

    /// Filter that belongs to no category and accepts none
    pub fn none() -> Self {
        CollisionFilter::new(0, 0)
    }

    /// Check if both sides accept each other's category
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }

    /// Check if this filter belongs to any of the given category bits
    pub fn is_in(&self, category: u32) -> bool {
        self.category & category != 0
    }
}

impl Component for CollisionFilter {}

/// Hit points of a damageable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Remaining hit points
    pub current: i32,
    /// Hit points at full health
    pub max: i32,
}

impl Health {
    /// Full health with the given maximum
    pub fn new(max: i32) -> Self {
        Health { current: max, max }
    }

    /// Subtract `amount` hit points. Returns true if the entity is now dead.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.current = self.current.saturating_sub(amount);
        self.is_dead()
    }

    /// Zero or fewer hit points is lethal
    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

impl Component for Health {}
