use bevy::prelude::*;

use crate::engine::core::config::ViewerConfig;

/// Marker whose on-screen size stays constant regardless of camera distance.
#[derive(Component)]
pub struct FixedScaleMarker;

/// Uniform scale that keeps a unit marker the same size on screen.
pub fn marker_scale(camera_distance: f32, scale_factor: f32) -> f32 {
    camera_distance * scale_factor
}

pub fn update_marker_scale(
    config: Res<ViewerConfig>,
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut markers: Query<&mut Transform, With<FixedScaleMarker>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let eye = camera.translation();
    for mut transform in &mut markers {
        let distance = eye.distance(transform.translation);
        transform.scale = Vec3::splat(marker_scale(distance, config.marker_scale_factor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_grows_linearly_with_distance() {
        assert_eq!(marker_scale(0.0, 0.015), 0.0);
        assert!((marker_scale(10.0, 0.015) - 0.15).abs() < 1e-6);
        assert!((marker_scale(20.0, 0.015) - 2.0 * marker_scale(10.0, 0.015)).abs() < 1e-6);
    }

    #[test]
    fn markers_follow_camera_distance() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewerConfig>()
            .add_systems(Update, update_marker_scale);

        app.world_mut().spawn((
            Camera3d::default(),
            GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 10.0)),
        ));
        let marker = app
            .world_mut()
            .spawn((Transform::default(), FixedScaleMarker))
            .id();
        app.update();

        let scale = app.world().get::<Transform>(marker).unwrap().scale;
        assert!((scale.x - 0.15).abs() < 1e-5);
    }
}
