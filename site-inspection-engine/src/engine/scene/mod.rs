//! Scene visualisation helpers for the inspection viewport.
//!
//! Provides the static floor grid, the snapping vertical reference grid and
//! constant-size endpoint markers.

/// Static 20x20 floor grid and the world axes helper.
pub mod floor_grid;

/// Line list mesh and unlit line material builders.
pub mod lines;

/// Endpoint markers that keep a fixed on-screen size.
pub mod markers;

/// Snapping vertical reference grid with anchor protocol and height markers.
///
/// Snaps to the nearest floor cell and exposes the `(cell_x, cell_z)` quadrant readout.
pub mod reference_grid;
