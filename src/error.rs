//! Errors reported by grid construction and node lookup.

/// Errors surfaced to callers of the grid core.
///
/// Mutations never fail on valid input; the only way to get an error out of
/// them is to name a node that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Cell count outside `1..=MAX_CELLS`. No grid is created.
    #[error("invalid grid size: {cells} cells per side (expected 1..={max})")]
    InvalidConfig {
        /// Requested cells per side
        cells: usize,
        /// Largest accepted value
        max: usize,
    },

    /// Coordinate or node index outside the grid. No mutation is performed.
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },

    /// Host-supplied config bytes could not be parsed.
    #[error("malformed grid config: {0}")]
    MalformedConfig(String),
}

impl GridError {
    /// Out-of-bounds error for a flat row-major index.
    pub(crate) fn index_out_of_bounds(index: usize, size: usize) -> Self {
        // size is always >= 1 for a constructed grid
        GridError::OutOfBounds {
            x: index % size,
            y: index / size,
            size,
        }
    }

    /// Numeric status handed across the wasm boundary.
    pub fn status_code(&self) -> u32 {
        match self {
            GridError::InvalidConfig { .. } => 1,
            GridError::OutOfBounds { .. } => 2,
            GridError::MalformedConfig(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_maps_to_row_major_coordinates() {
        let err = GridError::index_out_of_bounds(27, 5);
        assert_eq!(
            err,
            GridError::OutOfBounds {
                x: 2,
                y: 5,
                size: 5
            }
        );
        assert_eq!(err.status_code(), 2);
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = GridError::InvalidConfig { cells: 0, max: 256 };
        assert_eq!(
            err.to_string(),
            "invalid grid size: 0 cells per side (expected 1..=256)"
        );
    }
}
