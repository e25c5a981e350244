use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

/// Orbit camera around a focus point.
///
/// Left drag orbits, middle drag pans, the wheel zooms. Orbiting is suspended
/// through `controls_enabled` while a measurement drag is in progress.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub controls_enabled: bool,
}

impl ViewportCamera {
    /// Orbit state that places the eye at `eye` looking at `focus_point`.
    pub fn looking_at(eye: Vec3, focus_point: Vec3) -> Self {
        let offset = eye - focus_point;
        let distance = offset.length().max(0.1);
        Self {
            focus_point,
            distance,
            pitch: -(offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw: offset.x.atan2(offset.z),
            controls_enabled: true,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.focus_point + self.rotation() * Vec3::Z * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye_position()).with_rotation(self.rotation())
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::splat(5.0), Vec3::ZERO)
    }
}

pub fn spawn_viewport_camera(mut commands: Commands, viewport_camera: Res<ViewportCamera>) {
    commands.spawn((Camera3d::default(), viewport_camera.transform()));
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Left drag orbits around the focus point
    if orbit.controls_enabled
        && mouse_button.pressed(MouseButton::Left)
        && mouse_delta != Vec2::ZERO
    {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        orbit.yaw += -mouse_delta.x * yaw_sens;
        orbit.pitch += -mouse_delta.y * pitch_sens;
        orbit.pitch = orbit.pitch.clamp(-1.55, 1.55);
    }

    // Middle drag pans in the view plane
    if mouse_button.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
        let rotation = orbit.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let pan_speed = orbit.distance * 0.002;
        orbit.focus_point += (-right * mouse_delta.x + up * mouse_delta.y) * pan_speed;
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let zoom = (1.0 - scroll_accum * 0.1).clamp(0.5, 1.5);
        orbit.distance = (orbit.distance * zoom).clamp(0.5, 500.0);
    }

    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };
    let target = orbit.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_sits_at_five_five_five() {
        let camera = ViewportCamera::default();
        assert!((camera.eye_position() - Vec3::splat(5.0)).length() < 1e-4);

        // Forward vector points at the focus.
        let forward = camera.rotation() * Vec3::NEG_Z;
        let to_focus = (camera.focus_point - camera.eye_position()).normalize();
        assert!(forward.dot(to_focus) > 0.9999);
    }

    fn controller_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewportCamera>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<MouseMotion>()
            .add_event::<MouseWheel>()
            .add_systems(Update, camera_controller);
        app
    }

    fn drag_left(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(40.0, 0.0),
        });
        app.update();
    }

    #[test]
    fn left_drag_orbits_when_enabled() {
        let mut app = controller_app();
        let before = app.world().resource::<ViewportCamera>().yaw;
        drag_left(&mut app);
        assert_ne!(app.world().resource::<ViewportCamera>().yaw, before);
    }

    #[test]
    fn left_drag_is_ignored_while_suspended() {
        let mut app = controller_app();
        app.world_mut()
            .resource_mut::<ViewportCamera>()
            .controls_enabled = false;
        let before = app.world().resource::<ViewportCamera>().clone();
        drag_left(&mut app);
        assert_eq!(*app.world().resource::<ViewportCamera>(), before);
    }
}
