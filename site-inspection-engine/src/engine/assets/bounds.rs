use bevy::prelude::*;
use constants::tolerance::BBOX_EPSILON;
use serde::{Deserialize, Serialize};

/// Normalised element bounds as delivered by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
    pub zmin: f32,
    pub zmax: f32,
}

/// Centre and extents of a renderable box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoundingBox {
    /// Absolute extents; swapped min/max still yield a positive size.
    pub fn size(&self) -> Vec3 {
        Vec3::new(
            (self.xmax - self.xmin).abs(),
            (self.ymax - self.ymin).abs(),
            (self.zmax - self.zmin).abs(),
        )
    }

    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(
            self.xmin.min(self.xmax),
            self.ymin.min(self.ymax),
            self.zmin.min(self.zmax),
        )
    }

    pub fn center(&self) -> Vec3 {
        self.min_corner() + self.size() * 0.5
    }

    pub fn is_finite(&self) -> bool {
        [
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Any side below `BBOX_EPSILON` would produce zero-volume geometry.
    pub fn is_degenerate(&self) -> bool {
        self.size().min_element() < BBOX_EPSILON
    }

    /// Geometry for rendering, `None` for degenerate boxes.
    pub fn to_geometry(&self) -> Option<BoxGeometry> {
        if self.is_degenerate() {
            return None;
        }
        Some(BoxGeometry {
            center: self.center(),
            size: self.size(),
        })
    }
}

impl BoxGeometry {
    /// The twelve edges of the box as line segments, for wireframe meshes.
    pub fn edges(&self) -> [[Vec3; 2]; 12] {
        let h = self.size * 0.5;
        let c = self.center;
        let corner = |sx: f32, sy: f32, sz: f32| c + Vec3::new(sx * h.x, sy * h.y, sz * h.z);

        let p000 = corner(-1.0, -1.0, -1.0);
        let p100 = corner(1.0, -1.0, -1.0);
        let p010 = corner(-1.0, 1.0, -1.0);
        let p110 = corner(1.0, 1.0, -1.0);
        let p001 = corner(-1.0, -1.0, 1.0);
        let p101 = corner(1.0, -1.0, 1.0);
        let p011 = corner(-1.0, 1.0, 1.0);
        let p111 = corner(1.0, 1.0, 1.0);

        [
            // Bottom ring
            [p000, p100],
            [p100, p101],
            [p101, p001],
            [p001, p000],
            // Top ring
            [p010, p110],
            [p110, p111],
            [p111, p011],
            [p011, p010],
            // Uprights
            [p000, p010],
            [p100, p110],
            [p101, p111],
            [p001, p011],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox {
            xmin: 0.0,
            xmax: 2.0,
            ymin: 0.0,
            ymax: 3.0,
            zmin: -1.0,
            zmax: 1.0,
        }
    }

    #[test]
    fn centre_and_size() {
        let geometry = unit_box().to_geometry().unwrap();
        assert_eq!(geometry.size, Vec3::new(2.0, 3.0, 2.0));
        assert_eq!(geometry.center, Vec3::new(1.0, 1.5, 0.0));
    }

    #[test]
    fn swapped_bounds_give_the_same_box() {
        let swapped = BoundingBox {
            xmin: 2.0,
            xmax: 0.0,
            ..unit_box()
        };
        assert_eq!(swapped.to_geometry(), unit_box().to_geometry());
    }

    #[test]
    fn thin_boxes_are_degenerate() {
        let slab = BoundingBox {
            ymax: 0.005,
            ..unit_box()
        };
        assert!(slab.is_degenerate());
        assert!(slab.to_geometry().is_none());
    }

    #[test]
    fn non_finite_values_are_detected() {
        let broken = BoundingBox {
            zmax: f32::NAN,
            ..unit_box()
        };
        assert!(!broken.is_finite());
        assert!(unit_box().is_finite());
    }

    #[test]
    fn edges_touch_all_corners() {
        let geometry = unit_box().to_geometry().unwrap();
        let edges = geometry.edges();
        assert_eq!(edges.len(), 12);
        for [a, b] in edges {
            // Every edge runs along exactly one axis.
            let d = (b - a).abs();
            let moving_axes = [d.x, d.y, d.z].iter().filter(|v| **v > 0.0).count();
            assert_eq!(moving_axes, 1);
        }
    }
}
