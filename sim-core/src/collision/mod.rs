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
//! Collision resolution
//!
//! The collision pass turns proposed positions into committed transforms,
//! using the scene's quadtree as the broad phase and an external terrain
//! predicate as a final veto.

mod system;
mod terrain;

pub use system::{
    CollisionConfig, CollisionReport, CollisionSystem, DEFAULT_FALLBACK_SIZE,
    DEFAULT_PROJECTILE_DAMAGE,
};
pub use terrain::{OpenTerrain, TerrainSolidity};
