//! Procedural terrain synthesis: fractal-noise height fields weathered by
//! droplet-based hydraulic erosion.
//!
//! Pipeline: [`generator::generate_heightfield`] synthesizes the raw chunk,
//! [`erosion::erode`] weathers it in place through a precomputed
//! [`brush::ErosionBrush`], and the finished [`heightfield::HeightField`] is
//! handed off to the caller's mesh pipeline. [`generator::generate_terrain`]
//! composes the two stages; the brush is built once per chunk size and reused
//! across regenerations.

pub mod brush;
pub mod erosion;
pub mod error;
pub mod generator;
pub mod heightfield;
pub mod noise;

pub use self::brush::ErosionBrush;
pub use self::erosion::{erode, ErosionParams, ErosionStats};
pub use self::error::TerrainError;
pub use self::generator::{generate_heightfield, generate_terrain, TerrainParams};
pub use self::heightfield::HeightField;
pub use self::noise::FractalNoise;
