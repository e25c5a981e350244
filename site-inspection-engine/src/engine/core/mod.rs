//! Core application setup, configuration and state management.
//!
//! Handles application lifecycle, window configuration, runtime configuration
//! loading, the crate error type and plugin initialisation for native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loaders, viewport plugins and
/// platform-specific configurations.
pub mod app_setup;

/// Application state machine and viewport system ordering.
pub mod app_state;

/// Runtime viewer configuration with JSON asset overrides.
pub mod config;

/// Error type shared by element parsing, payload decoding and configuration.
pub mod error;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
