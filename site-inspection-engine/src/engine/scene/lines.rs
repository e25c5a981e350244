use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Build a line list mesh from independent segments.
pub fn line_list_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let mut vertices = Vec::with_capacity(segments.len() * 2);
    let mut indices = Vec::with_capacity(segments.len() * 2);

    for [a, b] in segments {
        let i = vertices.len() as u32;
        vertices.push(a.to_array());
        vertices.push(b.to_array());
        indices.extend_from_slice(&[i, i + 1]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Unlit material for overlay lines, blended when `colour` carries alpha.
pub fn line_material(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour,
        alpha_mode: if colour.alpha() < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        unlit: true,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_vertices_per_segment() {
        let mesh = line_list_mesh(&[[Vec3::ZERO, Vec3::X], [Vec3::Y, Vec3::Z]]);
        assert_eq!(mesh.count_vertices(), 4);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices, &vec![0, 1, 2, 3]),
            other => panic!("unexpected indices: {other:?}"),
        }
    }
}
