//! Data contracts consumed from the upstream analysis service.
//!
//! Handles analysis result documents, element bounding boxes and
//! per-element point cloud payloads.

/// Analysis result document with BIM elements, status descriptors and progress statistics.
pub mod analysis;

/// Axis-aligned element bounds and the wireframe geometry derived from them.
pub mod bounds;

/// Point cloud payload (`{ "positions": [...] }`) fetched per element.
pub mod point_cloud;
