use crate::error::{Result, VoronoiError};

/// Configuration of a diagram computation.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiConfig {
    /// Emit the border edges along the rectangle so every cell is a closed polygon.
    /// When `false`, only the clipped interior edges are returned.
    pub close_cells: bool,
    /// Tolerance relative to the largest side of the bounding box. It drives every
    /// "nearly equal" decision: coincident sites, breakpoint ties, vertex merging
    /// and snapping onto the rectangle.
    pub relative_tolerance: f64,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            close_cells: true,
            relative_tolerance: 1e-9,
        }
    }
}

impl VoronoiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_close_cells(mut self, close_cells: bool) -> Self {
        self.close_cells = close_cells;
        self
    }

    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.relative_tolerance.is_finite() || self.relative_tolerance <= 0.0 {
            return Err(VoronoiError::InvalidConfiguration {
                message: format!(
                    "relative tolerance must be a positive finite number, got {}",
                    self.relative_tolerance
                ),
            });
        }
        if self.relative_tolerance > 1e-3 {
            return Err(VoronoiError::InvalidConfiguration {
                message: format!(
                    "relative tolerance {} would merge distinct features; use at most 1e-3",
                    self.relative_tolerance
                ),
            });
        }
        Ok(())
    }
}
