//! Error types for edge-table construction and the scanline sweep

use thiserror::Error;

/// Result codes reported through `PF_get_last_error_code`.
pub mod codes {
    pub const OK: i32 = 0;
    /// Vertex outside the raster, or capacity exhausted.
    pub const OUT_OF_RANGE: i32 = 1;
    /// Odd active edge count during a sweep.
    pub const INCONSISTENT_STATE: i32 = 2;
    /// Vertex file could not be read or decoded.
    pub const FORMAT: i32 = 3;
    /// Null pointer or missing callback.
    pub const INVALID_ARGUMENT: i32 = 4;
    /// Null handle.
    pub const INVALID_HANDLE: i32 = -1;
}

/// Errors reported by the edge-table builder and the scanline sweep.
///
/// A polygon with nothing to fill (fewer than three vertices, or only
/// horizontal edges) is not an error: it builds an empty edge table and the
/// sweep draws nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("vertex ({x}, {y}) lies outside raster lines 0..{max_height}")]
    VertexOutOfRange { x: i32, y: i32, max_height: usize },
    #[error("capacity exceeded: {requested} requested, limit is {limit}")]
    CapacityExceeded { limit: usize, requested: usize },
    #[error("active edge table holds {active} edges on line {line}, expected an even count")]
    InconsistentState { line: usize, active: usize },
}

impl FillError {
    /// True for the out-of-range family (bad coordinates or exhausted capacity).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            FillError::VertexOutOfRange { .. } | FillError::CapacityExceeded { .. }
        )
    }

    /// Numeric code used by the C ABI.
    pub fn code(&self) -> i32 {
        if self.is_out_of_range() {
            codes::OUT_OF_RANGE
        } else {
            codes::INCONSISTENT_STATE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_family() {
        let e = FillError::VertexOutOfRange { x: 1, y: 900, max_height: 800 };
        assert!(e.is_out_of_range());
        assert_eq!(e.code(), codes::OUT_OF_RANGE);
        let e = FillError::CapacityExceeded { limit: 4, requested: 5 };
        assert!(e.is_out_of_range());
        let e = FillError::InconsistentState { line: 3, active: 1 };
        assert!(!e.is_out_of_range());
        assert_eq!(e.code(), codes::INCONSISTENT_STATE);
    }

    #[test]
    fn messages_name_the_values() {
        let e = FillError::VertexOutOfRange { x: 7, y: -1, max_height: 600 };
        assert_eq!(e.to_string(), "vertex (7, -1) lies outside raster lines 0..600");
    }
}
