use bevy::prelude::*;
use serde::Serialize;

use super::interaction::ViewportInteraction;
use super::session::{AxisLock, MeasureState};
use crate::engine::core::config::ViewerConfig;
use crate::rpc::web_rpc::WebRpcInterface;

/// Everything the measurement overlay shows, derived from the interaction state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementOverlay {
    pub state: MeasureState,
    pub mode_enabled: bool,
    pub is_measuring: bool,
    pub axis_lock: AxisLock,
    pub axis_label: Option<&'static str>,
    /// Three-decimal distance in metres, present once a start point exists.
    pub distance: Option<String>,
    pub start: Option<[f32; 3]>,
    pub end: Option<[f32; 3]>,
    pub midpoint: Option<[f32; 3]>,
    pub grid: Option<GridReadout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridReadout {
    pub anchored: bool,
    pub quadrant: (i32, i32),
}

impl MeasurementOverlay {
    pub fn from_interaction(interaction: &ViewportInteraction, cell_size: f32) -> Self {
        let session = &interaction.session;
        let grid = &interaction.grid;
        Self {
            state: session.state(),
            mode_enabled: session.is_mode_enabled(),
            is_measuring: session.is_measuring(),
            axis_lock: session.axis_lock(),
            axis_label: session.axis_lock().label(),
            distance: session.distance_label(),
            start: session.start_point().map(|p| p.to_array()),
            end: session.end_point().map(|p| p.to_array()),
            midpoint: session.midpoint().map(|p| p.to_array()),
            grid: grid.is_visible().then(|| GridReadout {
                anchored: grid.is_anchored(),
                quadrant: grid.quadrant(cell_size),
            }),
        }
    }

    /// Panel text: title, key help and status lines.
    pub fn panel_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.mode_enabled {
            lines.push("MEASURE MODE ON".to_string());
        } else {
            lines.push("Measure tool".to_string());
        }
        lines.push("SPACE = toggle measuring".to_string());
        if self.mode_enabled {
            lines.push("Click and drag to measure".to_string());
            lines.push("A = X axis (red)".to_string());
            lines.push("W = Y axis (green)".to_string());
            lines.push("S = Z axis (blue)".to_string());
            lines.push("R = free".to_string());
            lines.push("ESC to clear".to_string());
        }
        lines.push("G = vertical grid".to_string());
        if let Some(grid) = &self.grid {
            lines.push("Right click = anchor grid at point".to_string());
            if grid.anchored {
                lines.push("Grid anchored".to_string());
            } else {
                lines.push("Right click to anchor".to_string());
            }
        }
        if self.is_measuring {
            lines.push("Measuring...".to_string());
        }
        lines
    }

    /// Floating label text at the midpoint, e.g. `"5.000m"`.
    pub fn distance_text(&self) -> Option<String> {
        let distance = self.distance.as_ref()?;
        Some(match self.axis_label {
            Some(label) => format!("{distance}m\n{label}"),
            None => format!("{distance}m"),
        })
    }

    pub fn quadrant_text(&self) -> Option<String> {
        let (x, z) = self.grid?.quadrant;
        Some(format!("Quadrant  X: {x}  Z: {z}"))
    }
}

#[derive(Component)]
pub struct OverlayPanelText;

#[derive(Component)]
pub struct DistanceLabel;

#[derive(Component)]
pub struct QuadrantReadout;

pub fn spawn_measure_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                padding: UiRect::all(Val::Px(10.0)),
                max_width: Val::Px(260.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.06, 0.09, 0.16, 0.8)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.84, 0.88)),
                OverlayPanelText,
            ));
        });

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::NONE),
        Visibility::Hidden,
        DistanceLabel,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            right: Val::Px(16.0),
            padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.06, 0.09, 0.16, 0.95)),
        Visibility::Hidden,
        QuadrantReadout,
    ));
}

/// Refresh panel, floating distance label and quadrant readout.
pub fn update_measure_overlay(
    interaction: Res<ViewportInteraction>,
    config: Res<ViewerConfig>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut panel: Query<&mut Text, (With<OverlayPanelText>, Without<DistanceLabel>, Without<QuadrantReadout>)>,
    mut label: Query<
        (&mut Text, &mut Node, &mut Visibility, &mut BackgroundColor),
        (With<DistanceLabel>, Without<QuadrantReadout>),
    >,
    mut readout: Query<(&mut Text, &mut Visibility), (With<QuadrantReadout>, Without<DistanceLabel>)>,
) {
    let overlay = MeasurementOverlay::from_interaction(&interaction, config.grid_cell_size);

    if interaction.is_changed() {
        for mut text in &mut panel {
            text.0 = overlay.panel_lines().join("\n");
        }
        for (mut text, mut visibility) in &mut readout {
            match overlay.quadrant_text() {
                Some(quadrant) => {
                    text.0 = quadrant;
                    *visibility = Visibility::Visible;
                }
                None => *visibility = Visibility::Hidden,
            }
        }
    }

    // The label follows the camera, so it is re-projected every frame.
    let camera = cameras.single().ok();
    for (mut text, mut node, mut visibility, mut background) in &mut label {
        let screen = interaction
            .session
            .midpoint()
            .zip(camera)
            .and_then(|(midpoint, (camera, transform))| {
                camera.world_to_viewport(transform, midpoint).ok()
            });

        match (screen, overlay.distance_text()) {
            (Some(pos), Some(distance)) => {
                if text.0 != distance {
                    text.0 = distance;
                }
                node.left = Val::Px(pos.x);
                node.top = Val::Px(pos.y);
                background.0 = overlay.axis_lock.colour().with_alpha(0.9);
                *visibility = Visibility::Visible;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

/// Push overlay and measurement changes to the frontend.
pub fn notify_overlay_changes(
    interaction: Res<ViewportInteraction>,
    config: Res<ViewerConfig>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last: Local<Option<MeasurementOverlay>>,
) {
    if !interaction.is_changed() {
        return;
    }
    let overlay = MeasurementOverlay::from_interaction(&interaction, config.grid_cell_size);
    if last.as_ref() == Some(&overlay) {
        return;
    }

    let points_moved = last
        .as_ref()
        .is_none_or(|previous| previous.start != overlay.start || previous.end != overlay.end);
    if points_moved {
        if let (Some(start), Some(end)) = (overlay.start, overlay.end) {
            rpc_interface.send_notification(
                "measure_updated",
                serde_json::json!({
                    "start": start,
                    "end": end,
                    "distance": interaction.session.distance(),
                    "label": overlay.distance,
                    "axis_lock": overlay.axis_lock,
                }),
            );
        }
    }

    match serde_json::to_value(&overlay) {
        Ok(value) => rpc_interface.send_notification("overlay_changed", value),
        Err(err) => error!("Failed to serialise overlay: {}", err),
    }
    *last = Some(overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::commands::ViewportCommand;

    #[test]
    fn idle_overlay_is_minimal() {
        let overlay = MeasurementOverlay::from_interaction(&ViewportInteraction::default(), 1.0);
        assert_eq!(overlay.state, MeasureState::Idle);
        assert_eq!(overlay.distance, None);
        assert_eq!(overlay.grid, None);
        assert!(overlay.distance_text().is_none());
        assert!(!overlay.panel_lines().iter().any(|l| l.contains("ESC")));
    }

    #[test]
    fn locked_measurement_shows_axis_caption() {
        let mut interaction = ViewportInteraction::default();
        interaction.apply_command(ViewportCommand::ToggleMode);
        interaction.apply_command(ViewportCommand::SetAxisLock(AxisLock::X));
        interaction.primary_down(Vec3::ZERO, 1.0);
        interaction.pointer_moved(Vec3::new(2.5, 9.0, 9.0));

        let overlay = MeasurementOverlay::from_interaction(&interaction, 1.0);
        assert_eq!(overlay.distance.as_deref(), Some("2.500"));
        assert_eq!(
            overlay.distance_text().as_deref(),
            Some("2.500m\nX axis locked")
        );
        assert!(overlay.panel_lines().contains(&"Measuring...".to_string()));
    }

    #[test]
    fn grid_readout_reports_quadrant() {
        let mut interaction = ViewportInteraction::default();
        interaction.apply_command(ViewportCommand::ToggleGrid);
        interaction.secondary_down(Vec3::new(2.6, 0.0, -0.4));

        let overlay = MeasurementOverlay::from_interaction(&interaction, 1.0);
        assert_eq!(
            overlay.grid,
            Some(GridReadout {
                anchored: true,
                quadrant: (3, 0)
            })
        );
        assert_eq!(overlay.quadrant_text().as_deref(), Some("Quadrant  X: 3  Z: 0"));
        assert!(overlay.panel_lines().contains(&"Grid anchored".to_string()));
    }
}
