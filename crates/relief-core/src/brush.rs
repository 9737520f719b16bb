//! Precomputed erosion brush: for every cell, the in-bounds neighbors within
//! a circular radius and a linear-falloff weight for each.
//!
//! Built once per `(width, length, radius)` and reused across erosion passes.
//! Storage is a single flat arena with per-cell offsets rather than one
//! allocation per cell; out-of-bounds neighbors are omitted entirely, never
//! stored as zero-weight placeholders.

use crate::error::TerrainError;

/// Per-cell circular neighborhood table used to spread erosion spatially.
#[derive(Debug, Clone)]
pub struct ErosionBrush {
    width: usize,
    length: usize,
    radius: usize,
    /// Prefix offsets into `indices`/`weights`, `width * length + 1` entries.
    starts: Vec<u32>,
    indices: Vec<u32>,
    weights: Vec<f32>,
}

impl ErosionBrush {
    /// Build the brush for a `width x length` grid.
    ///
    /// A neighbor at offset `(dx, dz)` is included iff `dx^2 + dz^2 < radius^2`
    /// and the target coordinate is in bounds; its weight is
    /// `1 - dist / radius`. Note the strict inequality: radius 1 includes only
    /// the center cell itself.
    ///
    /// Cost is O(width * length * radius^2).
    pub fn build(width: usize, length: usize, radius: usize) -> Result<Self, TerrainError> {
        if width == 0 || length == 0 {
            return Err(TerrainError::InvalidDimensions { width, length });
        }
        if radius == 0 {
            return Err(TerrainError::InvalidRadius { radius });
        }

        let cells = width * length;
        let r = radius as isize;
        let mut starts = Vec::with_capacity(cells + 1);
        let mut indices = Vec::new();
        let mut weights = Vec::new();
        starts.push(0u32);

        for i in 0..cells {
            let cx = (i % width) as isize;
            let cz = (i / width) as isize;

            for dz in -r..=r {
                for dx in -r..=r {
                    let sq_dist = dx * dx + dz * dz;
                    if sq_dist >= r * r {
                        continue;
                    }
                    let nx = cx + dx;
                    let nz = cz + dz;
                    if nx < 0 || nx >= width as isize || nz < 0 || nz >= length as isize {
                        continue;
                    }
                    let weight = 1.0 - (sq_dist as f32).sqrt() / radius as f32;
                    indices.push((nz as usize * width + nx as usize) as u32);
                    weights.push(weight);
                }
            }
            starts.push(indices.len() as u32);
        }

        Ok(Self {
            width,
            length,
            radius,
            starts,
            indices,
            weights,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of stored neighbors for `cell`.
    #[inline]
    pub fn neighbor_count(&self, cell: usize) -> usize {
        (self.starts[cell + 1] - self.starts[cell]) as usize
    }

    /// Iterate the `(neighbor_cell, weight)` pairs for `cell`.
    ///
    /// Storage order is an implementation detail; callers may only rely on
    /// every included neighbor being present exactly once.
    #[inline]
    pub fn neighbors(&self, cell: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let lo = self.starts[cell] as usize;
        let hi = self.starts[cell + 1] as usize;
        self.indices[lo..hi]
            .iter()
            .zip(&self.weights[lo..hi])
            .map(|(&i, &w)| (i as usize, w))
    }
}
