//! Opaque grid handle.
//!
//! A [`GeoGrid`] is constructed from a named identifier (the standard CPC
//! global grids) or explicit dimensions, and exposes only what the core
//! needs: the flattened point count and an in-place y-flip. It is owned by
//! callers and never mutated by the assembly core.

use crate::constants::KNOWN_GRIDS;
use crate::{Error, Result};

/// Grid definition backing all flattened data arrays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoGrid {
    name: String,
    num_x: usize,
    num_y: usize,
}

impl GeoGrid {
    /// Look up one of the standard named grids
    pub fn from_name(name: &str) -> Result<Self> {
        KNOWN_GRIDS
            .iter()
            .find(|(known, _, _)| *known == name)
            .map(|&(known, num_x, num_y)| Self {
                name: known.to_string(),
                num_x,
                num_y,
            })
            .ok_or_else(|| {
                let names: Vec<&str> = KNOWN_GRIDS.iter().map(|(n, _, _)| *n).collect();
                Error::configuration(format!(
                    "unknown grid '{}', available grids: {}",
                    name,
                    names.join(", ")
                ))
            })
    }

    /// Build a grid with explicit dimensions
    pub fn custom(name: impl Into<String>, num_x: usize, num_y: usize) -> Result<Self> {
        if num_x == 0 || num_y == 0 {
            return Err(Error::configuration("grid dimensions must be non-zero"));
        }
        Ok(Self {
            name: name.into(),
            num_x,
            num_y,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_x(&self) -> usize {
        self.num_x
    }

    pub fn num_y(&self) -> usize {
        self.num_y
    }

    /// Length of every flattened array on this grid
    pub fn point_count(&self) -> usize {
        self.num_x * self.num_y
    }

    /// Reverse the row order of a flattened row-major array in place.
    ///
    /// Used for sources stored north-to-south (`yrev`).
    pub fn flip_y(&self, data: &mut [f32]) {
        debug_assert_eq!(data.len(), self.point_count());
        for row in 0..self.num_y / 2 {
            let mirror = self.num_y - 1 - row;
            for col in 0..self.num_x {
                data.swap(row * self.num_x + col, mirror * self.num_x + col);
            }
        }
    }
}
