//! Vertical reference grid for height estimation, snapped to the floor cells.
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::reference_grid::{
    GRID_LINE_OPACITY, GROUND_CELL_LIFT, GROUND_CELL_OPACITY, HEIGHT_TICK_HALF_LENGTH,
    TICK_SPACING,
};
use constants::render_settings::{
    GRID_AXIS_COLOUR, GRID_GROUND_CELL_COLOUR, GRID_XY_COLOUR, GRID_XY_EMPHASIS_COLOUR,
    GRID_ZY_COLOUR, GRID_ZY_EMPHASIS_COLOUR,
};

use super::lines::{line_list_mesh, line_material};
use crate::engine::core::config::ViewerConfig;
use crate::tools::measure::interaction::ViewportInteraction;

/// Nearest cell index along one axis. Halves round up.
pub fn cell_index(value: f32, cell_size: f32) -> i32 {
    (value / cell_size + 0.5).floor() as i32
}

/// Coordinate of the nearest cell line.
pub fn snap_coordinate(value: f32, cell_size: f32) -> f32 {
    cell_index(value, cell_size) as f32 * cell_size
}

/// Placement state of the reference grid.
///
/// A hidden grid is never anchored. Unanchored, the grid follows the pointer;
/// anchored, it stays put until it is toggled off.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridAnchor {
    position: Vec3,
    anchored: bool,
    visible: bool,
}

impl GridAnchor {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the grid. Hiding discards the anchor and tracked position.
    pub fn toggle_visibility(&mut self) -> bool {
        if self.visible {
            self.hide();
        } else {
            self.visible = true;
        }
        self.visible
    }

    pub fn hide(&mut self) {
        *self = Self::default();
    }

    /// Follow the live projection while visible and unanchored.
    pub fn track(&mut self, point: Vec3) -> bool {
        if !self.visible || self.anchored {
            return false;
        }
        self.position = point;
        true
    }

    /// Freeze the grid at `point`. Ignored when hidden or already anchored.
    pub fn anchor(&mut self, point: Vec3) -> bool {
        if !self.visible || self.anchored {
            return false;
        }
        self.position = point;
        self.anchored = true;
        true
    }

    pub fn snapped_origin(&self, cell_size: f32) -> Vec3 {
        Vec3::new(
            snap_coordinate(self.position.x, cell_size),
            0.0,
            snap_coordinate(self.position.z, cell_size),
        )
    }

    /// `(cell_x, cell_z)` of the snapped origin.
    pub fn quadrant(&self, cell_size: f32) -> (i32, i32) {
        (
            cell_index(self.position.x, cell_size),
            cell_index(self.position.z, cell_size),
        )
    }
}

/// Line segments of the reference grid, relative to its snapped origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceGridGeometry {
    pub xy_lines: Vec<[Vec3; 2]>,
    pub xy_emphasis: Vec<[Vec3; 2]>,
    pub zy_lines: Vec<[Vec3; 2]>,
    pub zy_emphasis: Vec<[Vec3; 2]>,
    /// Central vertical axis plus the cross ticks at every integer metre.
    pub axis: Vec<[Vec3; 2]>,
    pub height_markers: Vec<u32>,
}

const CENTRE_LINE_EPSILON: f32 = 1e-4;

/// Two orthogonal planes spanning one cell either side of the origin.
pub fn build_grid_lines(cell_size: f32, max_height: f32) -> ReferenceGridGeometry {
    let width = cell_size * 2.0;
    let half = width * 0.5;
    let vertical_count = (width / TICK_SPACING).floor() as usize + 1;
    let horizontal_count = (max_height / TICK_SPACING).floor() as usize + 1;
    let vertical = |offset: f32| {
        (
            [Vec3::new(offset, 0.0, 0.0), Vec3::new(offset, max_height, 0.0)],
            [Vec3::new(0.0, 0.0, offset), Vec3::new(0.0, max_height, offset)],
        )
    };

    let mut geometry = ReferenceGridGeometry::default();

    // The centre line always sits on the snapped origin; ticks landing there are skipped.
    let (xy, zy) = vertical(0.0);
    geometry.xy_emphasis.push(xy);
    geometry.zy_emphasis.push(zy);

    for i in 0..vertical_count {
        let offset = -half + i as f32 * TICK_SPACING;
        if offset.abs() < CENTRE_LINE_EPSILON {
            continue;
        }
        let (xy, zy) = vertical(offset);
        geometry.xy_lines.push(xy);
        geometry.zy_lines.push(zy);
    }

    for i in 0..horizontal_count {
        let y = i as f32 * TICK_SPACING;
        let xy = [Vec3::new(-half, y, 0.0), Vec3::new(half, y, 0.0)];
        let zy = [Vec3::new(0.0, y, -half), Vec3::new(0.0, y, half)];
        if i % 2 == 0 {
            geometry.xy_emphasis.push(xy);
            geometry.zy_emphasis.push(zy);
        } else {
            geometry.xy_lines.push(xy);
            geometry.zy_lines.push(zy);
        }
    }

    geometry
        .axis
        .push([Vec3::ZERO, Vec3::new(0.0, max_height, 0.0)]);

    let tick = HEIGHT_TICK_HALF_LENGTH;
    for metre in 0..=max_height.floor() as u32 {
        let y = metre as f32;
        geometry
            .axis
            .push([Vec3::new(-tick, y, 0.0), Vec3::new(tick, y, 0.0)]);
        geometry
            .axis
            .push([Vec3::new(0.0, y, -tick), Vec3::new(0.0, y, tick)]);
        geometry.height_markers.push(metre);
    }

    geometry
}

#[derive(Component)]
pub struct ReferenceGridRoot;

/// Screen label for one height marker, `None` for the max height caption.
#[derive(Component)]
pub struct HeightLabel {
    pub metres: Option<u32>,
    pub height: f32,
}

/// Rebuild the grid meshes and labels when the configuration changes.
pub fn rebuild_reference_grid(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing_roots: Query<Entity, With<ReferenceGridRoot>>,
    existing_labels: Query<Entity, With<HeightLabel>>,
) {
    if !config.is_changed() {
        return;
    }
    for entity in existing_roots.iter().chain(existing_labels.iter()) {
        commands.entity(entity).despawn();
    }

    let cell_size = config.grid_cell_size;
    let max_height = config.grid_max_height;
    let geometry = build_grid_lines(cell_size, max_height);

    let layers = [
        (&geometry.xy_lines, GRID_XY_COLOUR.with_alpha(GRID_LINE_OPACITY)),
        (
            &geometry.xy_emphasis,
            GRID_XY_EMPHASIS_COLOUR.with_alpha(GRID_LINE_OPACITY),
        ),
        (&geometry.zy_lines, GRID_ZY_COLOUR.with_alpha(GRID_LINE_OPACITY)),
        (
            &geometry.zy_emphasis,
            GRID_ZY_EMPHASIS_COLOUR.with_alpha(GRID_LINE_OPACITY),
        ),
        (&geometry.axis, GRID_AXIS_COLOUR),
    ];

    commands
        .spawn((
            Transform::IDENTITY,
            Visibility::Hidden,
            ReferenceGridRoot,
        ))
        .with_children(|parent| {
            for (segments, colour) in layers {
                parent.spawn((
                    Mesh3d(meshes.add(line_list_mesh(segments))),
                    MeshMaterial3d(materials.add(line_material(colour))),
                    NoFrustumCulling,
                    Transform::IDENTITY,
                ));
            }

            parent.spawn((
                Mesh3d(meshes.add(Plane3d::default().mesh().size(cell_size, cell_size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: GRID_GROUND_CELL_COLOUR.with_alpha(GROUND_CELL_OPACITY),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                })),
                Transform::from_xyz(0.0, GROUND_CELL_LIFT, 0.0),
            ));
        });

    for metre in &geometry.height_markers {
        spawn_height_label(&mut commands, format!("{metre}m"), Some(*metre), *metre as f32);
    }
    spawn_height_label(
        &mut commands,
        format!("Max height: {max_height}m"),
        None,
        max_height + 0.8,
    );

    debug!(
        "Reference grid rebuilt: cell {} m, height {} m",
        cell_size, max_height
    );
}

fn spawn_height_label(commands: &mut Commands, text: String, metres: Option<u32>, height: f32) {
    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(Color::BLACK),
        BackgroundColor(GRID_AXIS_COLOUR),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::axes(Val::Px(4.0), Val::Px(1.0)),
            ..default()
        },
        Visibility::Hidden,
        HeightLabel { metres, height },
    ));
}

/// Place the grid at the snapped anchor and show it only while enabled.
pub fn sync_reference_grid(
    interaction: Res<ViewportInteraction>,
    config: Res<ViewerConfig>,
    mut roots: Query<(&mut Transform, &mut Visibility), With<ReferenceGridRoot>>,
) {
    let grid = interaction.grid;
    for (mut transform, mut visibility) in &mut roots {
        transform.translation = grid.snapped_origin(config.grid_cell_size);
        *visibility = if grid.is_visible() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Project height labels next to the grid axis.
pub fn sync_height_labels(
    interaction: Res<ViewportInteraction>,
    config: Res<ViewerConfig>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut labels: Query<(&HeightLabel, &mut Node, &mut Visibility)>,
) {
    let grid = interaction.grid;
    let camera = cameras.single().ok();
    let origin = grid.snapped_origin(config.grid_cell_size);

    for (label, mut node, mut visibility) in &mut labels {
        let offset = if label.metres.is_some() { 0.5 } else { 0.0 };
        let world = origin + Vec3::new(offset, label.height, 0.0);
        let screen = camera
            .filter(|_| grid.is_visible())
            .and_then(|(camera, transform)| camera.world_to_viewport(transform, world).ok());

        match screen {
            Some(pos) => {
                node.left = Val::Px(pos.x);
                node.top = Val::Px(pos.y);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
