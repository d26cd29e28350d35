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
//! Error types for store operations
//!
//! Both variants signal a logic bug in the caller (usually system ordering),
//! so they are returned immediately and never retried.

use crate::ecs::EntityId;
use thiserror::Error;

/// Errors raised by strict component access on the [`World`](crate::ecs::World)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity is active but carries no component of the requested kind
    #[error("entity {entity} has no `{component}` component")]
    ComponentNotFound {
        /// Entity that was queried
        entity: EntityId,
        /// Type name of the missing component
        component: &'static str,
    },

    /// The entity was destroyed, never created, or belongs to another store
    #[error("entity {entity} is not active in this world")]
    InactiveEntity {
        /// Entity that was rejected
        entity: EntityId,
    },
}

/// Result alias used across the store API
pub type Result<T> = std::result::Result<T, EcsError>;
