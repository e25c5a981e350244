use bevy::prelude::*;
use constants::tolerance::PROJECTION_EPSILON;

/// Invisible plane the pointer ray is projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferencePlane {
    /// `y = height`, used for free and X/Z locked measuring.
    Horizontal { height: f32 },
    /// Plane facing +Z through `(x, *, z)`, used for vertical (Y locked) measuring.
    Vertical { x: f32, z: f32 },
}

impl ReferencePlane {
    fn point_and_normal(&self) -> (Vec3, Vec3) {
        match *self {
            Self::Horizontal { height } => (Vec3::new(0.0, height, 0.0), Vec3::Y),
            Self::Vertical { x, z } => (Vec3::new(x, 0.0, z), Vec3::Z),
        }
    }

    /// World point where `ray` meets the plane.
    ///
    /// `None` when the ray runs parallel to the plane or the plane lies behind the origin.
    pub fn intersect(&self, ray: &Ray3d) -> Option<Vec3> {
        let (point, normal) = self.point_and_normal();
        let direction: Vec3 = *ray.direction;

        let denom = direction.dot(normal);
        if denom.abs() < PROJECTION_EPSILON {
            return None;
        }
        let t = (point - ray.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.origin + direction * t)
    }
}

/// Camera ray through a cursor position in viewport pixels.
pub fn pointer_ray(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    cursor_pos: Vec2,
) -> Option<Ray3d> {
    camera.viewport_to_world(camera_transform, cursor_pos).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3, direction: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::new(direction).unwrap())
    }

    #[test]
    fn hits_floor_from_above() {
        let plane = ReferencePlane::Horizontal { height: 0.0 };
        let hit = plane
            .intersect(&ray(Vec3::new(1.0, 5.0, 3.0), Vec3::NEG_Y))
            .unwrap();
        assert!((hit - Vec3::new(1.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn raised_horizontal_plane() {
        let plane = ReferencePlane::Horizontal { height: 2.0 };
        let hit = plane
            .intersect(&ray(Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.0, -1.0, 0.0)))
            .unwrap();
        assert!((hit - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = ReferencePlane::Horizontal { height: 0.0 };
        assert!(plane.intersect(&ray(Vec3::Y, Vec3::X)).is_none());

        let wall = ReferencePlane::Vertical { x: 0.0, z: 0.0 };
        assert!(wall.intersect(&ray(Vec3::Z, Vec3::Y)).is_none());
    }

    #[test]
    fn plane_behind_origin_misses() {
        let plane = ReferencePlane::Horizontal { height: 0.0 };
        assert!(plane.intersect(&ray(Vec3::new(0.0, 5.0, 0.0), Vec3::Y)).is_none());
    }

    #[test]
    fn vertical_plane_keeps_start_depth() {
        let wall = ReferencePlane::Vertical { x: 1.0, z: 3.0 };
        let hit = wall
            .intersect(&ray(Vec3::new(1.0, 2.5, 10.0), Vec3::NEG_Z))
            .unwrap();
        assert!((hit - Vec3::new(1.0, 2.5, 3.0)).length() < 1e-5);
    }
}
