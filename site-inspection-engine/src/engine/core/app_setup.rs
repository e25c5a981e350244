use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::analysis::AnalysisResult;
use crate::engine::assets::point_cloud::PointCloudPayload;
use crate::engine::camera::viewport_camera::{ViewportCamera, spawn_viewport_camera};
use crate::engine::core::app_state::{AppState, ViewportSet};
use crate::engine::core::config::{
    ConfigLoader, ViewerConfig, apply_loaded_config, start_config_loading,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::elements::ElementsPlugin;
use crate::engine::loading::analysis_loader::{
    AnalysisLoader, AnalysisReceived, apply_analysis_result, poll_analysis_loading,
    start_analysis_loading,
};
use crate::engine::loading::point_cloud_loader::{
    PointCloudStore, poll_point_clouds, request_point_clouds,
};
use crate::engine::scene::floor_grid::create_ground_grid;
use crate::engine::scene::reference_grid::{
    rebuild_reference_grid, sync_height_labels, sync_reference_grid,
};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::viewport::ViewportPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::measure::MeasureToolPlugin;

#[cfg(target_arch = "wasm32")]
use crate::engine::loading::point_cloud_loader::register_remote_sources;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    // Asset sources have to exist before AssetPlugin builds.
    #[cfg(target_arch = "wasm32")]
    register_remote_sources(&mut app);

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Multi-dot extensions win over the bare `json` loader.
        .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["config.json"]))
        .add_plugins(JsonAssetPlugin::<AnalysisResult>::new(&["analysis.json"]))
        .add_plugins(JsonAssetPlugin::<PointCloudPayload>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.insert_resource(ViewerConfig::default())
        .insert_resource(AmbientLight {
            brightness: 400.0,
            ..default()
        })
        .init_resource::<ConfigLoader>()
        .init_resource::<AnalysisLoader>()
        .init_resource::<PointCloudStore>()
        .init_resource::<ViewportCamera>()
        .add_event::<AnalysisReceived>();

    app.configure_sets(
        Update,
        (
            ViewportSet::Input,
            ViewportSet::Interaction,
            ViewportSet::Sync,
        )
            .chain(),
    );

    app.add_plugins((ElementsPlugin, MeasureToolPlugin, ViewportPlugin));

    app.add_systems(
        Startup,
        (
            setup,
            start_config_loading,
            spawn_viewport_camera,
            create_ground_grid,
        ),
    );

    // Loading pipeline: config override, then the analysis document, then point clouds.
    app.add_systems(
        Update,
        (
            apply_loaded_config,
            start_analysis_loading,
            poll_analysis_loading,
            apply_analysis_result,
            request_point_clouds,
            poll_point_clouds,
        )
            .chain()
            .before(ViewportSet::Input),
    );

    app.add_systems(
        Update,
        (
            rebuild_reference_grid,
            sync_reference_grid,
            sync_height_labels,
        )
            .chain()
            .in_set(ViewportSet::Sync),
    );

    app.add_systems(
        Update,
        fps_notification_system.run_if(in_state(AppState::Inspecting)),
    );

    // Add the FPS overlay only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_fps_overlay)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

fn setup(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 3_000.0,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
