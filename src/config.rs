//! Grid configuration supplied by the host at construction time.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Cells per side used when the host does not say otherwise.
pub const DEFAULT_CELLS: usize = 10;

/// Upper bound on cells per side. Keeps N² allocations sane for host input.
pub const MAX_CELLS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per side (N).
    pub cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            cells: DEFAULT_CELLS,
        }
    }
}

impl GridConfig {
    pub fn new(cells: usize) -> Self {
        GridConfig { cells }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cells == 0 || self.cells > MAX_CELLS {
            return Err(GridError::InvalidConfig {
                cells: self.cells,
                max: MAX_CELLS,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config such as `{"cells": 12}`.
    /// Missing fields fall back to their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let config: GridConfig = serde_json::from_slice(bytes)
            .map_err(|e| GridError::MalformedConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
