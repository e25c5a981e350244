//! Shared tuning values for the site inspection viewport.

/// Asset locations for the analysis result, configuration and point clouds.
pub mod path;

/// Dynamic reference grid and floor grid dimensions.
pub mod reference_grid;

/// Colours, marker sizes and line widths for viewport overlays.
pub mod render_settings;

/// Geometric tolerances shared by projection and element filtering.
pub mod tolerance;
