use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::{DEFAULT_ANALYSIS_PATH, DEFAULT_POINT_CLOUD_BASE_PATH, VIEWER_CONFIG_PATH};
use constants::reference_grid::{DEFAULT_CELL_SIZE, DEFAULT_MAX_HEIGHT};
use constants::render_settings::MARKER_SCALE_FACTOR;
use serde::{Deserialize, Serialize};

use super::error::{ViewerError, ViewerResult};

/// Runtime settings for the inspection viewport.
///
/// Starts from the compiled defaults and is replaced once by the optional
/// `config/viewer.config.json` asset. Missing fields keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Asset, TypePath)]
#[serde(default)]
pub struct ViewerConfig {
    /// Floor cell edge used by the reference grid snap.
    pub grid_cell_size: f32,
    /// Height of the reference planes and of the highest metre marker.
    pub grid_max_height: f32,
    /// Endpoint marker scale per unit of camera distance.
    pub marker_scale_factor: f32,
    /// Asset path of the analysis result loaded at startup.
    pub analysis_path: String,
    /// Prefix for relative point cloud references.
    pub point_cloud_base_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: DEFAULT_CELL_SIZE,
            grid_max_height: DEFAULT_MAX_HEIGHT,
            marker_scale_factor: MARKER_SCALE_FACTOR,
            analysis_path: DEFAULT_ANALYSIS_PATH.to_string(),
            point_cloud_base_path: DEFAULT_POINT_CLOUD_BASE_PATH.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Reject values that would make snapping or grid generation meaningless.
    pub fn validate(&self) -> ViewerResult<()> {
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            )));
        }
        if !(self.grid_max_height.is_finite() && self.grid_max_height > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "grid_max_height must be positive, got {}",
                self.grid_max_height
            )));
        }
        if !(self.marker_scale_factor.is_finite() && self.marker_scale_factor > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "marker_scale_factor must be positive, got {}",
                self.marker_scale_factor
            )));
        }
        if self.analysis_path.trim().is_empty() {
            return Err(ViewerError::InvalidConfig(
                "analysis_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Classify a point cloud reference.
    ///
    /// `http://` and `https://` URLs are remote; anything else is an asset path
    /// joined onto `point_cloud_base_path`.
    pub fn point_cloud_source(&self, reference: &str) -> PointCloudSource {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return PointCloudSource::Remote(reference.to_string());
        }
        let base = self.point_cloud_base_path.trim_end_matches('/');
        if base.is_empty() {
            return PointCloudSource::Asset(reference.to_string());
        }
        PointCloudSource::Asset(format!("{}/{}", base, reference.trim_start_matches('/')))
    }
}

/// Where a point cloud is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointCloudSource {
    /// Path inside the default asset source.
    Asset(String),
    /// Absolute URL, loaded through the `http`/`https` asset sources.
    Remote(String),
}

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
    settled: bool,
}

impl ConfigLoader {
    /// True once the override was applied, rejected or found missing.
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

pub fn start_config_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Swap in the configuration override once it finishes loading.
pub fn apply_loaded_config(
    mut loader: ResMut<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
    mut config: ResMut<ViewerConfig>,
) {
    if loader.settled {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(loaded) = configs.get(&handle) {
        match loaded.validate() {
            Ok(()) => {
                info!("Viewer configuration loaded from {}", VIEWER_CONFIG_PATH);
                *config = loaded.clone();
            }
            Err(err) => warn!("{err}; keeping default configuration"),
        }
        loader.settled = true;
        return;
    }

    if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        info!("No viewer configuration override ({err}), using defaults");
        loader.settled = true;
    }
}
