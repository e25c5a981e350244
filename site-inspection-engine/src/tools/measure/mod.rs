//! Axis-locked distance measurement and the snapping reference grid controls.
//!
//! ## Interaction Flow
//!
//! ```text
//! Keyboard ──> KEY_BINDINGS ──> ViewportCommand ─┐
//! RPC viewport_command ─────────────────────────┤
//!                                               ├──> ViewportInteraction
//! Mouse ──> pointer ray ──> PointerInput ───────┘      ├─ MeasurementSession
//!                                                      └─ GridAnchor
//! ```
//!
//! Pointer rays are projected onto an invisible plane chosen by the session:
//! horizontal at the start height, or vertical through the start point while
//! the Y axis is locked. Category toggles arriving as viewport commands are
//! forwarded to the visibility engine.

/// Command enum, key table and keyboard dispatch.
pub mod commands;

/// Viewport interaction resource combining the session and the grid anchor.
pub mod interaction;

/// Overlay snapshot, screen labels and frontend notifications.
pub mod overlay;

/// Measurement session state machine, axis lock and distance formatting.
pub mod session;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{
    MEASURE_LINE_MIN_LENGTH, MEASURE_LINE_WIDTH, MARKER_SPHERE_RADIUS,
};

use crate::engine::camera::raycast::pointer_ray;
use crate::engine::core::app_state::{AppState, ViewportSet};
use crate::engine::core::config::ViewerConfig;
use crate::engine::elements::visibility::VisibilityCommand;
use crate::engine::scene::markers::{FixedScaleMarker, marker_scale, update_marker_scale};
use commands::{ViewportCommand, dispatch_keyboard_commands};
use interaction::{PointerButton, PointerInput, ViewportInteraction};
use overlay::{notify_overlay_changes, spawn_measure_overlay, update_measure_overlay};

#[derive(Component)]
pub struct MeasureVisual;

const POINTER_BUTTONS: [(MouseButton, PointerButton); 2] = [
    (MouseButton::Left, PointerButton::Primary),
    (MouseButton::Right, PointerButton::Secondary),
];

/// Pointer events for one frame, in the order they must be applied.
///
/// A click pressed and released between two frames shows up as both
/// `just_pressed` and `just_released`; the press goes first so the session
/// ends the frame released. Releases are kept without a ray, since the cursor
/// may have left the window.
pub fn frame_pointer_events(
    mouse: &ButtonInput<MouseButton>,
    moved: bool,
    ray: Option<Ray3d>,
) -> Vec<PointerInput> {
    let mut events = Vec::new();

    if let Some(ray) = ray {
        if moved {
            events.push(PointerInput::Move { ray });
        }
        for (mouse_button, button) in POINTER_BUTTONS {
            if mouse.just_pressed(mouse_button) {
                events.push(PointerInput::Down { button, ray });
            }
        }
    }

    for (mouse_button, button) in POINTER_BUTTONS {
        if mouse.just_released(mouse_button) {
            events.push(PointerInput::Up { button });
        }
    }

    events
}

/// Turn mouse buttons and cursor movement into world-space pointer events.
pub fn collect_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut pointer_events: EventWriter<PointerInput>,
) {
    let moved = cursor_moved.read().count() > 0;

    let ray = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .zip(cameras.single().ok())
        .and_then(|(cursor_pos, (camera, camera_transform))| {
            pointer_ray(camera, camera_transform, cursor_pos)
        });

    for event in frame_pointer_events(&mouse, moved, ray) {
        pointer_events.write(event);
    }
}

pub fn apply_pointer_input(
    mut events: EventReader<PointerInput>,
    config: Res<ViewerConfig>,
    mut interaction: ResMut<ViewportInteraction>,
) {
    for event in events.read() {
        // Misses and no-op moves must not trigger change detection.
        if interaction
            .bypass_change_detection()
            .handle_pointer(event, config.grid_cell_size)
        {
            interaction.set_changed();
        }
    }
}

pub fn apply_viewport_commands(
    mut events: EventReader<ViewportCommand>,
    mut interaction: ResMut<ViewportInteraction>,
    mut visibility_commands: EventWriter<VisibilityCommand>,
) {
    for command in events.read() {
        match *command {
            ViewportCommand::ToggleCategory(status) => {
                visibility_commands.write(VisibilityCommand::ToggleCategory(status));
            }
            other => {
                if interaction.bypass_change_detection().apply_command(other) {
                    interaction.set_changed();
                }
            }
        }
    }
}

pub fn reset_interaction(mut interaction: ResMut<ViewportInteraction>) {
    interaction.reset();
    info!("Viewport interaction reset");
}

/// Rebuild endpoint markers and the measurement line from the session.
pub fn update_measure_render(
    mut commands: Commands,
    interaction: Res<ViewportInteraction>,
    config: Res<ViewerConfig>,
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<MeasureVisual>>,
) {
    if !interaction.is_changed() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let session = &interaction.session;
    let Some(start) = session.start_point() else {
        return;
    };
    let colour = session.axis_lock().colour();
    let eye = cameras.single().ok().map(|t| t.translation());

    let marker_material = materials.add(StandardMaterial {
        base_color: colour.with_alpha(0.9),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let marker_mesh = meshes.add(Sphere::new(MARKER_SPHERE_RADIUS));

    for point in [Some(start), session.end_point()].into_iter().flatten() {
        let scale = eye.map_or(1.0, |eye| {
            marker_scale(eye.distance(point), config.marker_scale_factor)
        });
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(marker_material.clone()),
            Transform::from_translation(point).with_scale(Vec3::splat(scale)),
            FixedScaleMarker,
            MeasureVisual,
        ));
    }

    let Some(end) = session.end_point() else {
        return;
    };
    let dir = end - start;
    let dist = dir.length();
    if dist > MEASURE_LINE_MIN_LENGTH {
        let midpoint = (start + end) * 0.5;
        let rot = Quat::from_rotation_arc(Vec3::X, dir / dist);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(dist, MEASURE_LINE_WIDTH, MEASURE_LINE_WIDTH))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: colour,
                emissive: colour.to_linear(),
                unlit: true,
                ..default()
            })),
            Transform::from_translation(midpoint).with_rotation(rot),
            MeasureVisual,
        ));
    }
}

pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportInteraction>()
            .add_event::<ViewportCommand>()
            .add_event::<PointerInput>()
            .add_systems(Startup, spawn_measure_overlay)
            .add_systems(
                Update,
                (dispatch_keyboard_commands, collect_pointer_input)
                    .in_set(ViewportSet::Input)
                    .run_if(in_state(AppState::Inspecting)),
            )
            .add_systems(
                Update,
                (apply_viewport_commands, apply_pointer_input)
                    .chain()
                    .in_set(ViewportSet::Interaction),
            )
            .add_systems(
                Update,
                (
                    update_measure_render,
                    update_marker_scale,
                    update_measure_overlay,
                    notify_overlay_changes,
                )
                    .chain()
                    .in_set(ViewportSet::Sync),
            )
            .add_systems(OnExit(AppState::Inspecting), reset_interaction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::analysis::StatusCode;
    use crate::tools::measure::session::{AxisLock, MeasureState};
    use bevy::state::app::StatesPlugin;

    fn command_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ViewportInteraction>()
            .add_event::<ViewportCommand>()
            .add_event::<VisibilityCommand>()
            .add_systems(
                Update,
                (
                    dispatch_keyboard_commands.run_if(in_state(AppState::Inspecting)),
                    apply_viewport_commands,
                )
                    .chain(),
            )
            .add_systems(OnExit(AppState::Inspecting), reset_interaction);
        app
    }

    fn enter_inspecting(app: &mut App) {
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Inspecting);
        app.update();
    }

    fn press(app: &mut App, key: KeyCode) {
        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.release_all();
            keyboard.clear();
            keyboard.press(key);
        }
        app.update();
    }

    fn pointer_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewerConfig>()
            .init_resource::<ViewportInteraction>()
            .add_event::<PointerInput>()
            .add_systems(Update, apply_pointer_input);
        app.world_mut()
            .resource_mut::<ViewportInteraction>()
            .apply_command(ViewportCommand::ToggleMode);
        app
    }

    fn send_frame(
        app: &mut App,
        mouse: &ButtonInput<MouseButton>,
        moved: bool,
        ray: Option<Ray3d>,
    ) {
        for event in frame_pointer_events(mouse, moved, ray) {
            app.world_mut().send_event(event);
        }
        app.update();
    }

    fn down_ray(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 10.0, z), Dir3::NEG_Y)
    }

    #[test]
    fn same_frame_click_presses_before_releasing() {
        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
        assert!(mouse.just_pressed(MouseButton::Left));
        assert!(mouse.just_released(MouseButton::Left));

        let ray = down_ray(1.0, 2.0);
        let events = frame_pointer_events(&mouse, true, Some(ray));
        assert_eq!(
            events,
            vec![
                PointerInput::Move { ray },
                PointerInput::Down {
                    button: PointerButton::Primary,
                    ray
                },
                PointerInput::Up {
                    button: PointerButton::Primary
                },
            ]
        );
    }

    #[test]
    fn quick_click_leaves_session_armed() {
        let mut app = pointer_app();

        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
        send_frame(&mut app, &mouse, false, Some(down_ray(1.0, 2.0)));

        let session = &app.world().resource::<ViewportInteraction>().session;
        assert_eq!(session.state(), MeasureState::Armed);
        assert_eq!(session.distance_label().as_deref(), Some("0.000"));

        // Hovering afterwards must not drag the end point.
        mouse.clear();
        send_frame(&mut app, &mouse, true, Some(down_ray(5.0, 2.0)));
        let session = &app.world().resource::<ViewportInteraction>().session;
        assert_eq!(session.end_point(), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn release_outside_window_still_ends_measurement() {
        let mut app = pointer_app();

        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        send_frame(&mut app, &mouse, false, Some(down_ray(0.0, 0.0)));
        assert_eq!(
            app.world().resource::<ViewportInteraction>().session.state(),
            MeasureState::Measuring
        );

        mouse.clear();
        mouse.release(MouseButton::Left);
        send_frame(&mut app, &mouse, false, None);
        assert_eq!(
            app.world().resource::<ViewportInteraction>().session.state(),
            MeasureState::Armed
        );
    }

    #[test]
    fn keys_are_ignored_while_loading() {
        let mut app = command_app();
        press(&mut app, KeyCode::Space);
        let interaction = app.world().resource::<ViewportInteraction>();
        assert_eq!(interaction.session.state(), MeasureState::Idle);
    }

    #[test]
    fn keyboard_drives_mode_and_lock() {
        let mut app = command_app();
        enter_inspecting(&mut app);

        press(&mut app, KeyCode::Space);
        press(&mut app, KeyCode::KeyQ);
        let interaction = app.world().resource::<ViewportInteraction>();
        assert_eq!(interaction.session.state(), MeasureState::Armed);
        assert_eq!(interaction.session.axis_lock(), AxisLock::Z);

        press(&mut app, KeyCode::KeyR);
        press(&mut app, KeyCode::KeyG);
        let interaction = app.world().resource::<ViewportInteraction>();
        assert_eq!(interaction.session.axis_lock(), AxisLock::None);
        assert!(interaction.grid.is_visible());
    }

    #[test]
    fn digit_keys_forward_category_toggles() {
        let mut app = command_app();
        enter_inspecting(&mut app);
        press(&mut app, KeyCode::Digit4);

        let events = app.world().resource::<Events<VisibilityCommand>>();
        let mut cursor = events.get_cursor();
        let forwarded: Vec<_> = cursor.read(events).cloned().collect();
        assert_eq!(
            forwarded,
            vec![VisibilityCommand::ToggleCategory(StatusCode::Ausente)]
        );
    }

    #[test]
    fn leaving_inspection_resets_interaction() {
        let mut app = command_app();
        enter_inspecting(&mut app);
        press(&mut app, KeyCode::Space);
        press(&mut app, KeyCode::KeyG);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Loading);
        app.update();

        assert_eq!(
            *app.world().resource::<ViewportInteraction>(),
            ViewportInteraction::default()
        );
    }
}
