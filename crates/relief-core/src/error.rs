use thiserror::Error;

/// Errors reported by the terrain core.
///
/// All variants are detected before any grid is allocated or mutated.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Grid dimensions must be non-zero.
    #[error("invalid grid dimensions: {width}x{length}")]
    InvalidDimensions { width: usize, length: usize },

    /// Brush radius must be non-zero.
    #[error("invalid brush radius: {radius}")]
    InvalidRadius { radius: usize },

    /// The supplied brush was built for a different grid size.
    #[error("brush built for {brush_width}x{brush_length}, grid is {width}x{length}")]
    BrushMismatch {
        brush_width: usize,
        brush_length: usize,
        width: usize,
        length: usize,
    },
}
