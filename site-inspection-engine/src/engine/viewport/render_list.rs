use bevy::prelude::*;
use serde::Serialize;

use crate::engine::assets::analysis::{BimElement, StatusCode};
use crate::engine::assets::bounds::BoxGeometry;
use crate::engine::elements::visibility::VisibilitySets;
use crate::engine::loading::point_cloud_loader::PointCloudStore;

/// One visible element as it is drawn: wireframe box plus any loaded points.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry<'a> {
    pub guid: &'a str,
    pub status: StatusCode,
    pub geometry: BoxGeometry,
    pub box_colour: Color,
    pub points_colour: Color,
    pub points: Option<&'a [Vec3]>,
}

/// Serialisable digest of a render entry for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct RenderEntrySummary {
    pub guid: String,
    pub status: StatusCode,
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub point_count: usize,
}

impl RenderEntry<'_> {
    pub fn summary(&self) -> RenderEntrySummary {
        RenderEntrySummary {
            guid: self.guid.to_string(),
            status: self.status,
            center: self.geometry.center.to_array(),
            size: self.geometry.size.to_array(),
            point_count: self.points.map_or(0, |p| p.len()),
        }
    }
}

/// Visible elements with renderable bounds, in element order.
///
/// Elements with missing, malformed or degenerate boxes are left out; a missing
/// or failed point cloud only drops the points.
pub fn build_render_list<'a>(
    elements: &'a [BimElement],
    visibility: &VisibilitySets,
    point_clouds: &'a PointCloudStore,
) -> Vec<RenderEntry<'a>> {
    elements
        .iter()
        .filter(|element| visibility.is_element_visible(element))
        .filter_map(|element| {
            let geometry = element.render_geometry().ok().flatten()?;
            Some(RenderEntry {
                guid: &element.guid,
                status: element.status_code(),
                geometry,
                box_colour: element.box_colour(),
                points_colour: element.points_colour(),
                points: point_clouds.points(&element.guid),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::bounds::BoundingBox;
    use crate::engine::loading::point_cloud_loader::PointCloudEntry;

    fn cube(size: f32) -> BoundingBox {
        BoundingBox {
            xmin: 0.0,
            xmax: size,
            ymin: 0.0,
            ymax: size,
            zmin: 0.0,
            zmax: size,
        }
    }

    fn floor() -> Vec<BimElement> {
        vec![
            BimElement::new("wall", "IfcWall", StatusCode::Completo).with_bounds(cube(1.0)),
            BimElement::new("slab", "IfcSlab", StatusCode::Parcial).with_bounds(cube(2.0)),
            BimElement::new("flat", "IfcPlate", StatusCode::Parcial).with_bounds(cube(0.001)),
            BimElement::new("nobox", "IfcBeam", StatusCode::Iniciado),
        ]
    }

    #[test]
    fn skips_hidden_and_unrenderable_elements() {
        let elements = floor();
        let mut visibility = VisibilitySets::default();
        let store = PointCloudStore::default();

        let all: Vec<&str> = build_render_list(&elements, &visibility, &store)
            .iter()
            .map(|e| e.guid)
            .collect();
        assert_eq!(all, vec!["wall", "slab"]);

        visibility.hide_category(StatusCode::Completo);
        let visible: Vec<&str> = build_render_list(&elements, &visibility, &store)
            .iter()
            .map(|e| e.guid)
            .collect();
        assert_eq!(visible, vec!["slab"]);
    }

    #[test]
    fn points_are_attached_when_loaded() {
        let elements = floor();
        let visibility = VisibilitySets::default();
        let mut store = PointCloudStore::default();
        store.insert("wall", PointCloudEntry::Loaded(vec![Vec3::ZERO, Vec3::ONE]));
        store.insert("slab", PointCloudEntry::Failed);

        let list = build_render_list(&elements, &visibility, &store);
        assert_eq!(list[0].points.map(|p| p.len()), Some(2));
        assert_eq!(list[1].points, None);
        assert_eq!(list[0].summary().point_count, 2);
        assert_eq!(list[1].summary().size, [2.0, 2.0, 2.0]);
    }
}
