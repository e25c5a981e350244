use bevy::asset::LoadState;
use bevy::prelude::*;

use super::point_cloud_loader::PointCloudStore;
use crate::engine::assets::analysis::AnalysisResult;
use crate::engine::core::app_state::AppState;
use crate::engine::core::config::{ConfigLoader, ViewerConfig};
use crate::engine::core::error::ViewerError;
use crate::engine::elements::element_list::ElementList;
use crate::engine::elements::visibility::VisibilitySets;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::interaction::ViewportInteraction;

/// Tracks the analysis document currently being fetched.
#[derive(Resource, Default)]
pub struct AnalysisLoader {
    handle: Option<Handle<AnalysisResult>>,
    requested_path: Option<String>,
    delivered: bool,
}

impl AnalysisLoader {
    /// Fetch a different analysis document; it replaces the current one on arrival.
    pub fn request(&mut self, asset_server: &AssetServer, path: &str) {
        info!("Loading analysis result from {}", path);
        self.handle = Some(asset_server.load(path.to_string()));
        self.requested_path = Some(path.to_string());
        self.delivered = false;
    }

    pub fn requested_path(&self) -> Option<&str> {
        self.requested_path.as_deref()
    }
}

/// A complete analysis result ready to replace the current element list.
#[derive(Event, Debug, Clone)]
pub struct AnalysisReceived(pub AnalysisResult);

/// Kick off the startup fetch once the configuration override has settled.
pub fn start_analysis_loading(
    mut loader: ResMut<AnalysisLoader>,
    config_loader: Res<ConfigLoader>,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
) {
    if loader.requested_path.is_some() || !config_loader.is_settled() {
        return;
    }
    let path = config.analysis_path.clone();
    loader.request(&asset_server, &path);
}

pub fn poll_analysis_loading(
    mut loader: ResMut<AnalysisLoader>,
    asset_server: Res<AssetServer>,
    results: Res<Assets<AnalysisResult>>,
    mut received: EventWriter<AnalysisReceived>,
) {
    if loader.delivered {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(result) = results.get(&handle) {
        received.write(AnalysisReceived(result.clone()));
        loader.delivered = true;
        return;
    }

    if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!(
            "Analysis result {} failed to load: {}",
            loader.requested_path.as_deref().unwrap_or("<unknown>"),
            err
        );
        loader.delivered = true;
    }
}

/// Replace the element list and reset everything scoped to the previous result.
pub fn apply_analysis_result(
    mut events: EventReader<AnalysisReceived>,
    mut elements: ResMut<ElementList>,
    mut visibility: ResMut<VisibilitySets>,
    mut interaction: ResMut<ViewportInteraction>,
    mut point_clouds: ResMut<PointCloudStore>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(AnalysisReceived(result)) = events.read().last() else {
        return;
    };

    let list = ElementList::from_result(result);

    let mut skipped = 0;
    for element in &list.elements {
        match element.render_geometry() {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("Element {} has a degenerate bounding box", element.guid);
                skipped += 1;
            }
            Err(err @ ViewerError::MalformedBoundingBox { .. }) => {
                warn!("{err}; element skipped");
                skipped += 1;
            }
            Err(err) => warn!("{err}"),
        }
    }

    info!(
        "Analysis applied{}: {} elements, {} without renderable bounds",
        list.floor_name
            .as_deref()
            .map(|name| format!(" for {name}"))
            .unwrap_or_default(),
        list.elements.len(),
        skipped
    );

    rpc_interface.send_notification(
        "analysis_loaded",
        serde_json::json!({
            "floor": list.floor_name,
            "total": list.elements.len(),
            "skipped": skipped,
            "statistics": list.statistics,
            "summary_by_type": list.summary_by_type(),
        }),
    );

    *elements = list;
    visibility.reset();
    interaction.reset();
    point_clouds.reset();
    next_state.set(AppState::Inspecting);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::analysis::{BimElement, StatusCode};
    use crate::engine::assets::bounds::BoundingBox;
    use bevy::state::app::StatesPlugin;

    fn loader_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<ElementList>()
            .init_resource::<VisibilitySets>()
            .init_resource::<ViewportInteraction>()
            .init_resource::<PointCloudStore>()
            .init_resource::<WebRpcInterface>()
            .add_event::<AnalysisReceived>()
            .add_systems(Update, apply_analysis_result);
        app
    }

    fn result_with(elements: Vec<BimElement>) -> AnalysisResult {
        AnalysisResult {
            results: Some(elements),
            ..default()
        }
    }

    #[test]
    fn new_result_replaces_list_and_resets_state() {
        let mut app = loader_app();
        app.world_mut()
            .resource_mut::<VisibilitySets>()
            .hide_category(StatusCode::Ausente);
        app.world_mut()
            .resource_mut::<ViewportInteraction>()
            .grid
            .toggle_visibility();

        let bounds = BoundingBox {
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            zmin: 0.0,
            zmax: 1.0,
        };
        app.world_mut().send_event(AnalysisReceived(result_with(vec![
            BimElement::new("a", "IfcWall", StatusCode::Completo).with_bounds(bounds),
            BimElement::new("b", "IfcSlab", StatusCode::Ausente),
        ])));
        app.update();
        app.update();

        let world = app.world();
        assert_eq!(world.resource::<ElementList>().elements.len(), 2);
        assert_eq!(*world.resource::<VisibilitySets>(), VisibilitySets::default());
        assert_eq!(
            *world.resource::<ViewportInteraction>(),
            ViewportInteraction::default()
        );
        assert_eq!(*world.resource::<State<AppState>>().get(), AppState::Inspecting);
    }
}
