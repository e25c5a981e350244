/// Edge length of one floor cell in world units (metres).
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Spacing of the fine tick lines on the vertical reference planes.
/// Independent of the cell size.
pub const TICK_SPACING: f32 = 0.5;

/// Highest integer-metre marker drawn on the reference grid.
pub const DEFAULT_MAX_HEIGHT: f32 = 10.0;

/// Half length of the cross ticks drawn at every integer metre.
pub const HEIGHT_TICK_HALF_LENGTH: f32 = 0.2;

/// Opacity of the reference plane lines.
pub const GRID_LINE_OPACITY: f32 = 0.6;

/// Opacity of the ground cell marker under the grid origin.
pub const GROUND_CELL_OPACITY: f32 = 0.3;

/// Lift above y = 0 so the ground cell marker does not z-fight the floor grid.
pub const GROUND_CELL_LIFT: f32 = 0.01;

/// Number of cells along each side of the static floor grid.
pub const FLOOR_GRID_CELLS: u32 = 20;

/// Every n-th floor grid line is drawn as a section line.
pub const FLOOR_GRID_SECTION_EVERY: u32 = 5;

/// Length of each arm of the world axes helper.
pub const AXES_HELPER_LENGTH: f32 = 5.0;
