//! Viewport camera and pointer projection.
//!
//! Provides orbit camera controls with smooth interpolation and the projection
//! of pointer rays onto the invisible measurement reference planes.

/// Pointer ray construction and reference plane intersection.
pub mod raycast;

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
