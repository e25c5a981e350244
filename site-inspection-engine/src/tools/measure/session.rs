use bevy::prelude::*;
use constants::render_settings::{AXIS_FREE_COLOUR, AXIS_X_COLOUR, AXIS_Y_COLOUR, AXIS_Z_COLOUR};
use serde::{Deserialize, Serialize};

use crate::engine::camera::raycast::ReferencePlane;

/// World axis a measurement is confined to. `None` measures freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLock {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl AxisLock {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "free" => Some(Self::None),
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    /// Overlay caption, `None` when unlocked.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::X => Some("X axis locked"),
            Self::Y => Some("Y axis locked"),
            Self::Z => Some("Z axis locked"),
        }
    }

    pub fn colour(&self) -> Color {
        match self {
            Self::None => AXIS_FREE_COLOUR,
            Self::X => AXIS_X_COLOUR,
            Self::Y => AXIS_Y_COLOUR,
            Self::Z => AXIS_Z_COLOUR,
        }
    }
}

/// Coarse measurement state derived from the session flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureState {
    /// Measure mode off.
    Idle,
    /// Mode on, waiting for a primary press.
    Armed,
    /// Primary pointer held, the end point follows the pointer.
    Measuring,
}

/// Confine `candidate` to the locked axis through `start`.
///
/// The coordinates of the two axes that are not locked are copied from `start`.
pub fn clamp_to_axis(start: Vec3, candidate: Vec3, lock: AxisLock) -> Vec3 {
    match lock {
        AxisLock::None => candidate,
        AxisLock::X => Vec3::new(candidate.x, start.y, start.z),
        AxisLock::Y => Vec3::new(start.x, candidate.y, start.z),
        AxisLock::Z => Vec3::new(start.x, start.y, candidate.z),
    }
}

pub fn format_distance(distance: f32) -> String {
    format!("{:.3}", distance)
}

/// Single distance measurement with mode, drag state and axis lock.
///
/// An end point only exists together with a start point, and while locked the
/// end point differs from the start along the locked axis only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSession {
    measure_mode_enabled: bool,
    is_measuring: bool,
    start_point: Option<Vec3>,
    end_point: Option<Vec3>,
    axis_lock: AxisLock,
}

impl MeasurementSession {
    pub fn state(&self) -> MeasureState {
        match (self.measure_mode_enabled, self.is_measuring) {
            (false, _) => MeasureState::Idle,
            (true, false) => MeasureState::Armed,
            (true, true) => MeasureState::Measuring,
        }
    }

    pub fn is_mode_enabled(&self) -> bool {
        self.measure_mode_enabled
    }

    pub fn is_measuring(&self) -> bool {
        self.is_measuring
    }

    pub fn start_point(&self) -> Option<Vec3> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<Vec3> {
        self.end_point
    }

    pub fn axis_lock(&self) -> AxisLock {
        self.axis_lock
    }

    /// Flip measure mode. Leaving the mode clears the session.
    pub fn toggle_mode(&mut self) -> bool {
        if self.measure_mode_enabled {
            self.clear();
            self.measure_mode_enabled = false;
        } else {
            self.measure_mode_enabled = true;
        }
        self.measure_mode_enabled
    }

    /// Drop the current measurement. The mode flag is kept.
    pub fn cancel(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        self.is_measuring = false;
        self.start_point = None;
        self.end_point = None;
        self.axis_lock = AxisLock::None;
    }

    /// Plane the next pointer position is projected onto.
    pub fn reference_plane(&self) -> ReferencePlane {
        let start = self.start_point.unwrap_or(Vec3::ZERO);
        match self.axis_lock {
            AxisLock::Y => ReferencePlane::Vertical {
                x: start.x,
                z: start.z,
            },
            _ => ReferencePlane::Horizontal { height: start.y },
        }
    }

    /// Start measuring at `point`. Only valid while armed.
    pub fn begin(&mut self, point: Vec3) -> bool {
        if self.state() != MeasureState::Armed {
            return false;
        }
        self.start_point = Some(point);
        self.end_point = Some(point);
        self.is_measuring = true;
        true
    }

    /// Start measuring at `point` with `lock` forced on.
    pub fn begin_with_lock(&mut self, point: Vec3, lock: AxisLock) -> bool {
        if !self.begin(point) {
            return false;
        }
        self.axis_lock = lock;
        true
    }

    /// Move the end point towards `candidate`, honouring the axis lock.
    pub fn update_end(&mut self, candidate: Vec3) -> bool {
        if !self.is_measuring {
            return false;
        }
        let Some(start) = self.start_point else {
            return false;
        };
        self.end_point = Some(clamp_to_axis(start, candidate, self.axis_lock));
        true
    }

    /// Finish the drag. Points stay on screen until the next press or a cancel.
    pub fn release(&mut self) -> bool {
        let was_measuring = self.is_measuring;
        self.is_measuring = false;
        was_measuring
    }

    /// Change the axis lock. Ignored while measure mode is off.
    pub fn set_axis_lock(&mut self, lock: AxisLock) -> bool {
        if !self.measure_mode_enabled {
            return false;
        }
        self.axis_lock = lock;
        true
    }

    pub fn distance(&self) -> Option<f32> {
        Some(self.start_point?.distance(self.end_point?))
    }

    /// Distance with three decimals, e.g. `"5.000"`.
    pub fn distance_label(&self) -> Option<String> {
        self.distance().map(format_distance)
    }

    /// Anchor for the floating distance label.
    pub fn midpoint(&self) -> Option<Vec3> {
        Some((self.start_point? + self.end_point?) * 0.5)
    }
}
