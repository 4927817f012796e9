//! Grid view configuration.
//!
//! `GridConfig` carries the geometry knobs shared by the windowing model,
//! the row pipeline and the pagination controller. Hosts typically build
//! one per view, validate it once, and hand it to [`GridTable::new`].
//!
//! [`GridTable::new`]: crate::table::GridTable::new

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Overscan must be a finite, non-negative pixel amount.
    #[error("overscan must be finite and >= 0, got {0}")]
    InvalidOverscan(f64),
    /// Row height must be a finite, positive pixel amount.
    #[error("row height must be finite and > 0, got {0}")]
    InvalidRowHeight(f64),
    /// Default column width must be a finite, positive pixel amount.
    #[error("default column width must be finite and > 0, got {0}")]
    InvalidDefaultWidth(f64),
    /// Pagination margin must be a finite, non-negative pixel amount.
    #[error("pagination margin must be finite and >= 0, got {0}")]
    InvalidPaginationMargin(f64),
}

/// Geometry and behavior settings for a grid table view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Extra pixel margin added on both sides of the visible span before
    /// column windowing.
    pub overscan: f64,
    /// Number of leading columns exempt from virtualization trimming.
    pub sticky_start: usize,
    /// Number of trailing columns exempt from virtualization trimming.
    pub sticky_end: usize,
    /// Uniform row height in pixels.
    pub row_height: f64,
    /// Width used when a rendered column key is missing from the width map.
    pub default_column_width: f64,
    /// Symmetric margin extending the sentinel trigger zone beyond the
    /// visible edges, so more rows are requested before the user reaches
    /// the true bottom.
    pub pagination_margin: f64,
    /// When false, no column is ever trimmed and the window covers the
    /// full definition range.
    pub virtualize: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            overscan: 200.0,
            sticky_start: 0,
            sticky_end: 0,
            row_height: 28.0,
            default_column_width: 120.0,
            pagination_margin: 300.0,
            virtualize: true,
        }
    }
}

impl GridConfig {
    /// Create a config with default geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overscan margin.
    pub fn with_overscan(mut self, px: f64) -> Self {
        self.overscan = px;
        self
    }

    /// Set sticky column counts.
    pub fn with_sticky(mut self, start: usize, end: usize) -> Self {
        self.sticky_start = start;
        self.sticky_end = end;
        self
    }

    /// Set the uniform row height.
    pub fn with_row_height(mut self, px: f64) -> Self {
        self.row_height = px;
        self
    }

    /// Enable or disable column virtualization.
    pub fn with_virtualize(mut self, on: bool) -> Self {
        self.virtualize = on;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.overscan.is_finite() || self.overscan < 0.0 {
            return Err(ConfigError::InvalidOverscan(self.overscan));
        }
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        if !self.default_column_width.is_finite() || self.default_column_width <= 0.0 {
            return Err(ConfigError::InvalidDefaultWidth(self.default_column_width));
        }
        if !self.pagination_margin.is_finite() || self.pagination_margin < 0.0 {
            return Err(ConfigError::InvalidPaginationMargin(self.pagination_margin));
        }
        Ok(())
    }
}
