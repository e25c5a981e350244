/// Optional runtime configuration, loaded through the JSON asset pipeline.
pub const VIEWER_CONFIG_PATH: &str = "config/viewer.config.json";

/// Default analysis result produced by the remote analysis service.
pub const DEFAULT_ANALYSIS_PATH: &str = "analysis/latest.analysis.json";

/// Prefix prepended to relative point cloud references (`session_id/file.json`).
pub const DEFAULT_POINT_CLOUD_BASE_PATH: &str = "outputs";
