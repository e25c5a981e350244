//! Static floor grid and world axes shown under the inspected elements.
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::reference_grid::{
    AXES_HELPER_LENGTH, DEFAULT_CELL_SIZE, FLOOR_GRID_CELLS, FLOOR_GRID_SECTION_EVERY,
};
use constants::render_settings::{
    AXIS_X_COLOUR, AXIS_Y_COLOUR, AXIS_Z_COLOUR, FLOOR_CELL_COLOUR, FLOOR_SECTION_COLOUR,
};

use super::lines::{line_list_mesh, line_material};

#[derive(Component)]
pub struct GroundGrid;

/// Cell and section lines of a square floor grid centred on the origin.
pub fn floor_grid_lines(cells: u32, cell_size: f32, section_every: u32) -> (Vec<[Vec3; 2]>, Vec<[Vec3; 2]>) {
    let half = cells as f32 * cell_size * 0.5;
    let mut cell_lines = Vec::new();
    let mut section_lines = Vec::new();

    for i in 0..=cells {
        let offset = -half + i as f32 * cell_size;
        let along_z = [Vec3::new(offset, 0.0, -half), Vec3::new(offset, 0.0, half)];
        let along_x = [Vec3::new(-half, 0.0, offset), Vec3::new(half, 0.0, offset)];

        let target = if section_every > 0 && i % section_every == 0 {
            &mut section_lines
        } else {
            &mut cell_lines
        };
        target.push(along_z);
        target.push(along_x);
    }

    (cell_lines, section_lines)
}

pub fn create_ground_grid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (cell_lines, section_lines) =
        floor_grid_lines(FLOOR_GRID_CELLS, DEFAULT_CELL_SIZE, FLOOR_GRID_SECTION_EVERY);

    let axes = [
        (Vec3::X, AXIS_X_COLOUR),
        (Vec3::Y, AXIS_Y_COLOUR),
        (Vec3::Z, AXIS_Z_COLOUR),
    ];

    let mut layers = vec![
        (cell_lines, FLOOR_CELL_COLOUR),
        (section_lines, FLOOR_SECTION_COLOUR),
    ];
    for (direction, colour) in axes {
        layers.push((vec![[Vec3::ZERO, direction * AXES_HELPER_LENGTH]], colour));
    }

    for (segments, colour) in layers {
        commands.spawn((
            Mesh3d(meshes.add(line_list_mesh(&segments))),
            MeshMaterial3d(materials.add(line_material(colour))),
            Visibility::Visible,
            NoFrustumCulling,
            Transform::IDENTITY,
            GroundGrid,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_by_twenty_grid() {
        let (cells, sections) = floor_grid_lines(20, 1.0, 5);
        // 21 lines per direction, indices 0, 5, 10, 15 and 20 are sections.
        assert_eq!(sections.len(), 2 * 5);
        assert_eq!(cells.len(), 2 * 16);

        let extent = sections
            .iter()
            .flatten()
            .map(|p| p.x.abs().max(p.z.abs()))
            .fold(0.0, f32::max);
        assert_eq!(extent, 10.0);
    }
}
