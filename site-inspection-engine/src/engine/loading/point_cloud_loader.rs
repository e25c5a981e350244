use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::point_cloud::PointCloudPayload;
use crate::engine::core::config::{PointCloudSource, ViewerConfig};
use crate::engine::elements::element_list::ElementList;

/// Load state of one element's point cloud.
#[derive(Debug, Clone)]
pub enum PointCloudEntry {
    Loading(Handle<PointCloudPayload>),
    Loaded(Vec<Vec3>),
    /// Fetch or decode failed; the element renders its box only.
    Failed,
}

/// Point clouds keyed by element guid.
#[derive(Resource, Debug, Default)]
pub struct PointCloudStore {
    entries: HashMap<String, PointCloudEntry>,
}

impl PointCloudStore {
    /// Loaded points, `None` while loading, after a failure or without a reference.
    pub fn points(&self, guid: &str) -> Option<&[Vec3]> {
        match self.entries.get(guid) {
            Some(PointCloudEntry::Loaded(points)) => Some(points),
            _ => None,
        }
    }

    pub fn entry(&self, guid: &str) -> Option<&PointCloudEntry> {
        self.entries.get(guid)
    }

    pub fn insert(&mut self, guid: impl Into<String>, entry: PointCloudEntry) {
        self.entries.insert(guid.into(), entry);
    }

    pub fn loaded_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, PointCloudEntry::Loaded(_)))
            .count()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// URL schemes registered as asset sources in the browser build.
pub const REMOTE_SCHEMES: [&str; 2] = ["http", "https"];

/// Absolute URLs are fetched by the browser; native builds have no HTTP reader.
pub const REMOTE_FETCH_SUPPORTED: bool = cfg!(target_arch = "wasm32");

/// Register `http` and `https` asset sources so absolute point cloud URLs load.
///
/// Must run before `AssetPlugin` is added.
#[cfg(target_arch = "wasm32")]
pub fn register_remote_sources(app: &mut App) {
    use bevy::asset::AssetApp;
    use bevy::asset::io::AssetSourceBuilder;
    use bevy::asset::io::wasm::HttpWasmAssetReader;

    for scheme in REMOTE_SCHEMES {
        app.register_asset_source(
            scheme,
            AssetSourceBuilder::default().with_reader(move || {
                Box::new(HttpWasmAssetReader::new(format!("{scheme}://")))
            }),
        );
    }
}

/// Asset path to load for `source`, `None` when it cannot be fetched here.
pub fn load_path(source: PointCloudSource, remote_supported: bool) -> Option<String> {
    match source {
        PointCloudSource::Asset(path) => Some(path),
        PointCloudSource::Remote(url) if remote_supported => Some(url),
        PointCloudSource::Remote(_) => None,
    }
}

/// Start fetching the point cloud of every element that references one.
pub fn request_point_clouds(
    elements: Res<ElementList>,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    mut store: ResMut<PointCloudStore>,
) {
    if !elements.is_changed() {
        return;
    }

    let mut requested = 0;
    for element in &elements.elements {
        let Some(reference) = element.point_cloud_ref() else {
            continue;
        };
        if store.entry(&element.guid).is_some() {
            continue;
        }
        let source = config.point_cloud_source(reference);
        let Some(path) = load_path(source, REMOTE_FETCH_SUPPORTED) else {
            warn!(
                "Point cloud for {} is a remote URL, not fetchable in this build: {}",
                element.guid, reference
            );
            store.insert(element.guid.clone(), PointCloudEntry::Failed);
            continue;
        };
        store.insert(
            element.guid.clone(),
            PointCloudEntry::Loading(asset_server.load(path)),
        );
        requested += 1;
    }

    if requested > 0 {
        info!("Requested {} element point clouds", requested);
    }
}

/// Move finished fetches into the store, tolerating failures per element.
pub fn poll_point_clouds(
    asset_server: Res<AssetServer>,
    payloads: Res<Assets<PointCloudPayload>>,
    mut store: ResMut<PointCloudStore>,
) {
    let mut finished = Vec::new();

    for (guid, entry) in store.bypass_change_detection().entries.iter() {
        let PointCloudEntry::Loading(handle) = entry else {
            continue;
        };

        if let Some(payload) = payloads.get(handle) {
            let next = match payload.to_positions() {
                Ok(points) => {
                    debug!("Point cloud for {} loaded: {} points", guid, points.len());
                    PointCloudEntry::Loaded(points)
                }
                Err(err) => {
                    warn!("Point cloud for {}: {}", guid, err);
                    PointCloudEntry::Failed
                }
            };
            finished.push((guid.clone(), next));
        } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
            warn!("Point cloud for {} failed to load: {}", guid, err);
            finished.push((guid.clone(), PointCloudEntry::Failed));
        }
    }

    // Only touch change detection when something settled.
    if !finished.is_empty() {
        for (guid, entry) in finished {
            store.insert(guid, entry);
        }
    }
}
