use bevy::color::Color;

/// Endpoint markers are rescaled every frame to `camera_distance * MARKER_SCALE_FACTOR`
/// so they keep a constant on-screen size.
pub const MARKER_SCALE_FACTOR: f32 = 0.015;

/// Unit sphere radius before the per-frame marker scale is applied.
pub const MARKER_SPHERE_RADIUS: f32 = 1.0;

/// Cross-section of the cuboid used to draw the measurement line.
pub const MEASURE_LINE_WIDTH: f32 = 0.03;

/// Segments shorter than this are not drawn as a line.
pub const MEASURE_LINE_MIN_LENGTH: f32 = 0.02;

/// Opacity of element wireframe boxes.
pub const ELEMENT_BOX_OPACITY: f32 = 0.4;

// Measurement line colours by axis lock.
pub const AXIS_X_COLOUR: Color = Color::srgb(0.937, 0.267, 0.267); // #ef4444
pub const AXIS_Y_COLOUR: Color = Color::srgb(0.133, 0.773, 0.369); // #22c55e
pub const AXIS_Z_COLOUR: Color = Color::srgb(0.231, 0.510, 0.965); // #3b82f6
pub const AXIS_FREE_COLOUR: Color = Color::srgb(0.976, 0.451, 0.086); // #f97316

// Reference grid colours.
pub const GRID_XY_COLOUR: Color = Color::srgb(0.231, 0.510, 0.965); // #3b82f6
pub const GRID_XY_EMPHASIS_COLOUR: Color = Color::srgb(0.376, 0.647, 0.980); // #60a5fa
pub const GRID_ZY_COLOUR: Color = Color::srgb(0.133, 0.773, 0.369); // #22c55e
pub const GRID_ZY_EMPHASIS_COLOUR: Color = Color::srgb(0.290, 0.871, 0.502); // #4ade80
pub const GRID_AXIS_COLOUR: Color = Color::srgb(0.984, 0.749, 0.141); // #fbbf24
pub const GRID_GROUND_CELL_COLOUR: Color = Color::srgb(0.024, 0.714, 0.831); // #06b6d4

// Floor grid colours.
pub const FLOOR_CELL_COLOUR: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);
pub const FLOOR_SECTION_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Status colour fallback for element boxes when the record carries none.
pub const ELEMENT_BOX_FALLBACK_HEX: &str = "#cccccc";

/// Status colour fallback for element point clouds.
pub const ELEMENT_POINTS_FALLBACK_HEX: &str = "#00ff00";
