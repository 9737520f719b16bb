use serde::{Deserialize, Serialize};

/// A 2D height field storing per-cell elevations as f32, row-major.
///
/// Cell `(x, z)` lives at `data[z * width + x]`. Dimensions are fixed for the
/// lifetime of the field; the erosion pass mutates `data` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightField {
    /// Row-major elevation values, `width * length` entries.
    pub data: Vec<f32>,
    pub width: usize,
    pub length: usize,
}

impl HeightField {
    /// Create a new HeightField filled with the given value.
    pub fn new(width: usize, length: usize, fill: f32) -> Self {
        Self {
            data: vec![fill; width * length],
            width,
            length,
        }
    }

    /// Create a flat (zero-elevation) HeightField.
    pub fn flat(width: usize, length: usize) -> Self {
        Self::new(width, length, 0.0)
    }

    #[inline]
    pub fn index_of(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[z * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, val: f32) {
        self.data[z * self.width + x] = val;
    }

    /// Sample the field at continuous grid coordinates using bilinear
    /// interpolation. Returns None outside `[0, width-1] x [0, length-1]`.
    pub fn sample(&self, x: f32, z: f32) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        if x < 0.0 || z < 0.0 || x > (self.width - 1) as f32 || z > (self.length - 1) as f32 {
            return None;
        }

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.length - 1);

        let fx = x - x0 as f32;
        let fz = z - z0 as f32;

        let nw = self.get(x0, z0);
        let ne = self.get(x1, z0);
        let sw = self.get(x0, z1);
        let se = self.get(x1, z1);

        let v = nw * (1.0 - fx) * (1.0 - fz)
            + ne * fx * (1.0 - fz)
            + sw * (1.0 - fx) * fz
            + se * fx * fz;

        Some(v)
    }

    pub fn min_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }
}
