//! Uniform spatial grid for neighbor search.
//!
//! The domain is partitioned into square cells of side `2h`. A particle's
//! kernel support (radius `h`) is then always covered by its own cell plus
//! the 8 surrounding cells, so neighbor queries only ever touch the Moore
//! neighborhood of one cell.
//!
//! The grid stores indices into the simulation's particle store, never
//! particles themselves: membership, not ownership. It is rebuilt from
//! scratch every step because particle positions change continuously.
//!
//! Indexing invariant: a particle at `p` lives in the bucket
//! `floor(p.x / cell) * num_cols + floor(p.y / cell)` ("rows" advance along
//! x), and [`SpatialGrid::neighbor_buckets`] derives its offsets from the
//! same `(row, col)` decomposition with per-axis bounds checks, so
//! neighborhoods never wrap across grid edges. The two sides of this
//! invariant are pinned together by the boundary-case tests below.

use bevy::prelude::*;

use super::boundary::DomainBounds;
use super::particle::Particle;

/// Uniform bucket grid over the simulation domain.
#[derive(Default, Debug)]
pub struct SpatialGrid {
    buckets: Vec<Vec<usize>>,
    num_rows: usize,
    num_cols: usize,
    cell_size: f32,
}

impl SpatialGrid {
    /// Clears all buckets and reinserts every particle from its current
    /// position.
    ///
    /// Particles with non-finite coordinates are skipped; they remain in the
    /// particle store but take no part in the physics until their position
    /// becomes finite again (which, under forward Euler, it never does).
    /// Returns how many particles were skipped so the caller can report it.
    pub fn rebuild(&mut self, particles: &[Particle], bounds: &DomainBounds, cell_size: f32) -> usize {
        self.cell_size = cell_size;
        self.num_rows = (bounds.width / cell_size).ceil() as usize;
        self.num_cols = (bounds.height / cell_size).ceil() as usize;

        self.buckets.clear();
        self.buckets.resize(self.num_rows * self.num_cols, Vec::new());

        let mut skipped = 0;
        for (i, particle) in particles.iter().enumerate() {
            if !particle.position.is_finite() {
                skipped += 1;
                continue;
            }
            let index = self.cell_index(particle.position);
            self.buckets[index].push(i);
        }
        skipped
    }

    /// Bucket index for a position: `row * num_cols + col` with
    /// `row = floor(x / cell)`, `col = floor(y / cell)`.
    ///
    /// Out-of-domain positions are clamped onto the edge cells; `as usize`
    /// saturates negative coordinates to row/col 0.
    pub fn cell_index(&self, position: Vec2) -> usize {
        let row = ((position.x / self.cell_size) as usize).min(self.num_rows - 1);
        let col = ((position.y / self.cell_size) as usize).min(self.num_cols - 1);
        row * self.num_cols + col
    }

    /// The Moore neighborhood of a cell: the cell itself plus its up-to-8
    /// adjacent cells, filtered to valid indices.
    pub fn neighbor_buckets(&self, index: usize) -> Vec<usize> {
        let row = (index / self.num_cols) as isize;
        let col = (index % self.num_cols) as isize;

        let mut cells = Vec::with_capacity(9);
        for dr in -1..=1 {
            for dc in -1..=1 {
                let r = row + dr;
                let c = col + dc;
                if r >= 0
                    && c >= 0
                    && (r as usize) < self.num_rows
                    && (c as usize) < self.num_cols
                {
                    cells.push(r as usize * self.num_cols + c as usize);
                }
            }
        }
        cells
    }

    /// Particle indices stored in one bucket.
    pub fn bucket(&self, index: usize) -> &[usize] {
        &self.buckets[index]
    }

    /// Total number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Grid dimensions as `(num_rows, num_cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    /// Total number of particle references across all buckets.
    pub fn stored_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
