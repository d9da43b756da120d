//! Minimum-distance bookkeeping for accepted placements.
//!
//! Positions are bucketed into a hash grid whose cell size equals the minimum
//! distance, so a query only inspects the 27 surrounding cells. Positions whose
//! cell coordinate does not fit the grid are kept in a separate list that is
//! always scanned. Results match a linear scan over every accepted position.
use std::collections::HashMap;

use glam::{IVec3, Vec3};

/// Largest cell coordinate magnitude kept in the grid.
const CELL_LIMIT: f32 = (1u32 << 30) as f32;

#[derive(Debug, Clone, Default)]
pub struct SpacingIndex {
    min_distance: f32,
    positions: Vec<Vec3>,
    cells: HashMap<IVec3, Vec<usize>>,
    outside: Vec<usize>,
}

impl SpacingIndex {
    /// Creates an index enforcing `min_distance`. Values `<= 0` disable the check.
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance: min_distance.max(0.0),
            positions: Vec::new(),
            cells: HashMap::new(),
            outside: Vec::new(),
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    fn is_enabled(&self) -> bool {
        self.min_distance > 0.0
    }

    fn cell_of(&self, p: Vec3) -> Option<IVec3> {
        let cell = (p / self.min_distance).floor();
        (cell.is_finite() && cell.abs().max_element() <= CELL_LIMIT).then(|| cell.as_ivec3())
    }

    fn within(&self, indices: &[usize], position: Vec3, limit_sq: f32) -> bool {
        indices
            .iter()
            .any(|&i| self.positions[i].distance_squared(position) < limit_sq)
    }

    pub fn insert(&mut self, position: Vec3) {
        let index = self.positions.len();
        self.positions.push(position);
        if self.is_enabled() {
            match self.cell_of(position) {
                Some(cell) => self.cells.entry(cell).or_default().push(index),
                None => self.outside.push(index),
            }
        }
    }

    /// True if an accepted position lies strictly closer than the minimum distance.
    pub fn is_too_close(&self, position: Vec3) -> bool {
        if !self.is_enabled() || self.positions.is_empty() {
            return false;
        }
        let limit_sq = self.min_distance * self.min_distance;
        let Some(center) = self.cell_of(position) else {
            return self
                .positions
                .iter()
                .any(|p| p.distance_squared(position) < limit_sq);
        };
        if self.within(&self.outside, position, limit_sq) {
            return true;
        }
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = self.cells.get(&(center + IVec3::new(dx, dy, dz))) else {
                        continue;
                    };
                    if self.within(bucket, position, limit_sq) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.cells.clear();
        self.outside.clear();
    }
}
