//! Loading of analysis results and element point clouds.
//!
//! The analysis document is fetched once the configuration settles and again
//! whenever the frontend requests another one. Point clouds are fetched per
//! element after each result is applied; individual failures are tolerated.

/// Analysis result fetching and the system applying a new result.
///
/// Applying replaces the element list and resets visibility, interaction and point clouds.
pub mod analysis_loader;

/// Per-element point cloud fetching keyed by element guid.
pub mod point_cloud_loader;
