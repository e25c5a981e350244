//! Runtime diagnostics systems.
//!
//! Frame rate is pushed to the dashboard over RPC and mirrored in a native
//! overlay on desktop builds.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;
