/// Bounding boxes with any side shorter than this are treated as absent.
pub const BBOX_EPSILON: f32 = 0.01;

/// Rays whose direction is this close to parallel with a reference plane do not intersect it.
pub const PROJECTION_EPSILON: f32 = 1e-6;
