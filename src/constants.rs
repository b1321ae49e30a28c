//! Application constants for the geofiles processor
//!
//! This module contains template token names, default formatting values,
//! known grid definitions and external tool names used throughout the
//! application.

// =============================================================================
// File-name template tokens
// =============================================================================

/// Placeholder tokens recognised by the template expander
pub const TEMPLATE_TOKENS: &[&str] = &["yyyy", "mm", "dd", "cc", "hh", "fhr", "member"];

/// Cycle assumed when a date key carries no cycle component (YYYYMMDD)
pub const DEFAULT_CYCLE: &str = "00";

// =============================================================================
// Known grids
// =============================================================================

/// Standard CPC grid definitions as (name, num_x, num_y)
pub const KNOWN_GRIDS: &[(&str, usize, usize)] = &[
    ("1deg-global", 360, 181),
    ("2deg-global", 180, 91),
    ("2.5deg-global", 144, 73),
];

// =============================================================================
// Flat binary layout
// =============================================================================

/// Bytes per value in flat binary files (little-endian f32)
pub const BYTES_PER_VALUE: usize = 4;

// =============================================================================
// Text report formatting
// =============================================================================

/// Default column delimiter for text reports
pub const DEFAULT_DELIMITER: char = ' ';

/// Default number of decimal places for report values
pub const DEFAULT_PRECISION: usize = 5;

// =============================================================================
// External GRIB tools
// =============================================================================

/// Name of the wgrib executable used for GRIB1 files
pub const WGRIB1_BIN: &str = "wgrib";

/// Name of the wgrib2 executable used for GRIB2 files
pub const WGRIB2_BIN: &str = "wgrib2";
