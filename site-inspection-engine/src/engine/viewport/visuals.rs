use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::ELEMENT_BOX_OPACITY;

use super::render_list::build_render_list;
use crate::engine::elements::element_list::ElementList;
use crate::engine::elements::visibility::VisibilitySets;
use crate::engine::loading::point_cloud_loader::PointCloudStore;
use crate::engine::scene::lines::{line_list_mesh, line_material};

/// Scene entity drawn for one element of the render list.
#[derive(Component)]
pub struct ElementVisual {
    pub guid: String,
}

fn point_list_mesh(points: &[Vec3]) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD);
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Rebuild element entities whenever the list, visibility or point clouds change.
pub fn sync_element_visuals(
    mut commands: Commands,
    elements: Res<ElementList>,
    visibility: Res<VisibilitySets>,
    point_clouds: Res<PointCloudStore>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<ElementVisual>>,
) {
    if !(elements.is_changed() || visibility.is_changed() || point_clouds.is_changed()) {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let render_list = build_render_list(&elements.elements, &visibility, &point_clouds);
    for entry in &render_list {
        let edges = entry.geometry.edges();
        commands.spawn((
            Mesh3d(meshes.add(line_list_mesh(&edges))),
            MeshMaterial3d(materials.add(line_material(
                entry.box_colour.with_alpha(ELEMENT_BOX_OPACITY),
            ))),
            Transform::IDENTITY,
            NoFrustumCulling,
            ElementVisual {
                guid: entry.guid.to_string(),
            },
        ));

        if let Some(points) = entry.points.filter(|p| !p.is_empty()) {
            commands.spawn((
                Mesh3d(meshes.add(point_list_mesh(points))),
                MeshMaterial3d(materials.add(line_material(entry.points_colour))),
                Transform::IDENTITY,
                NoFrustumCulling,
                ElementVisual {
                    guid: entry.guid.to_string(),
                },
            ));
        }
    }

    debug!(
        "Rendering {} of {} elements",
        render_list.len(),
        elements.elements.len()
    );
}
