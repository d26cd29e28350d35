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
//! Terrain solidity predicate supplied by the host
//!
//! The tile map lives outside the core. The collision pass only asks whether
//! a proposed box overlaps solid terrain.

use crate::spatial::Rect;

/// Answers whether a region of the level is solid
pub trait TerrainSolidity: Send + Sync {
    /// Check if any solid terrain overlaps `bounds`
    fn is_solid(&self, bounds: &Rect) -> bool;
}

/// Terrain with no solid tiles
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl TerrainSolidity for OpenTerrain {
    fn is_solid(&self, _bounds: &Rect) -> bool {
        false
    }
}

impl<F> TerrainSolidity for F
where
    F: Fn(&Rect) -> bool + Send + Sync,
{
    fn is_solid(&self, bounds: &Rect) -> bool {
        self(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_terrain() {
        let floor_y = 100.0;
        let terrain = move |b: &Rect| b.bottom() > floor_y;
        assert!(!terrain.is_solid(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(terrain.is_solid(&Rect::new(0.0, 95.0, 10.0, 10.0)));
        assert!(!OpenTerrain.is_solid(&Rect::new(0.0, 95.0, 10.0, 10.0)));
    }
}
