use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::rpc::web_rpc::WebRpcInterface;

/// Seconds between `fps_update` notifications.
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;

fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f32> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .map(|value| value as f32)
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL {
        return;
    }

    if let Some(fps) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification("fps_update", serde_json::json!({ "fps": fps }));
        *last_send_time = current_time;
    }
}

pub fn spawn_fps_overlay(mut commands: Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.84, 0.88)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        FpsText,
    ));
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(fps) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {fps:.1}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_text_follows_diagnostics() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DiagnosticsStore>()
            .add_systems(Startup, spawn_fps_overlay)
            .add_systems(Update, fps_text_update_system);
        app.update();

        // Without an FPS diagnostic the placeholder stays untouched.
        let mut texts = app
            .world_mut()
            .query_filtered::<&Text, With<FpsText>>();
        let text = texts.iter(app.world()).next().unwrap();
        assert_eq!(text.0, "FPS: ");
    }
}
