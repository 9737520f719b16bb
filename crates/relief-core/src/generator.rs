//! Chunk generation: fractal-noise synthesis followed by hydraulic erosion.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::brush::ErosionBrush;
use crate::erosion::{erode, ErosionParams};
use crate::error::TerrainError;
use crate::heightfield::HeightField;
use crate::noise::FractalNoise;

/// Default chunk edge length, in cells.
pub const CHUNK_SIZE: usize = 512;

/// Full parameter set for one terrain chunk.
///
/// `world_offset` shifts the noise-space sampling window so adjacent chunks
/// continue the same field: a chunk at offset `(width, 0)` lines up seamlessly
/// with its neighbor at `(0, 0)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainParams {
    pub seed: u64,
    pub width: usize,
    pub length: usize,
    /// Vertical scale applied to the unit-range noise.
    pub amplitude: f32,
    /// Base noise frequency, cycles per grid unit.
    pub frequency: f64,
    pub octaves: u32,
    pub world_offset: (f32, f32),
    pub erosion: ErosionParams,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 42,
            width: CHUNK_SIZE,
            length: CHUNK_SIZE,
            amplitude: 150.0,
            frequency: 0.01,
            octaves: 10,
            world_offset: (0.0, 0.0),
            erosion: ErosionParams::default(),
        }
    }
}

/// Synthesize the raw (unweathered) height field for `params`.
///
/// Fails with [`TerrainError::InvalidDimensions`] before any allocation when
/// either dimension is zero.
pub fn generate_heightfield(params: &TerrainParams) -> Result<HeightField, TerrainError> {
    if params.width == 0 || params.length == 0 {
        return Err(TerrainError::InvalidDimensions {
            width: params.width,
            length: params.length,
        });
    }

    let noise = FractalNoise::new((params.seed & 0xFFFF_FFFF) as u32, params.octaves);
    let off_x = params.world_offset.0 as f64;
    let off_z = params.world_offset.1 as f64;
    let amplitude = params.amplitude;
    let frequency = params.frequency;

    let mut hf = HeightField::flat(params.width, params.length);

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        let width = params.width;
        hf.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(z, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = noise.sample(x as f64 + off_x, z as f64 + off_z, frequency) * amplitude;
                }
            });
    }

    #[cfg(not(feature = "threading"))]
    for z in 0..params.length {
        for x in 0..params.width {
            let h = noise.sample(x as f64 + off_x, z as f64 + off_z, frequency) * amplitude;
            hf.set(x, z, h);
        }
    }

    Ok(hf)
}

/// Generate a fully weathered chunk: noise synthesis, then one erosion pass.
///
/// The brush is caller-supplied so it can be built once per chunk size and
/// reused across regenerations. The erosion RNG is derived from the chunk
/// seed, so equal parameters yield identical terrain.
pub fn generate_terrain(
    params: &TerrainParams,
    brush: &ErosionBrush,
) -> Result<HeightField, TerrainError> {
    if brush.width() != params.width || brush.length() != params.length {
        return Err(TerrainError::BrushMismatch {
            brush_width: brush.width(),
            brush_length: brush.length(),
            width: params.width,
            length: params.length,
        });
    }

    let mut hf = generate_heightfield(params)?;
    let mut rng = StdRng::seed_from_u64(params.seed ^ 0x9E37_79B9_7F4A_7C15);
    erode(&mut hf, brush, &params.erosion, &mut rng);
    Ok(hf)
}
