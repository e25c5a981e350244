use bevy::prelude::*;

use super::commands::ViewportCommand;
use super::session::{AxisLock, MeasureState, MeasurementSession};
use crate::engine::scene::reference_grid::GridAnchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button, measures.
    Primary,
    /// Right mouse button, anchors the reference grid.
    Secondary,
}

/// Pointer activity over the viewport, already turned into world rays.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { button: PointerButton, ray: Ray3d },
    Move { ray: Ray3d },
    Up { button: PointerButton },
}

/// Transient interaction state of the viewport: one measurement and the reference grid.
///
/// Reset when measuring is abandoned, when a new analysis result is applied and
/// when the inspection view is left.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ViewportInteraction {
    pub session: MeasurementSession,
    pub grid: GridAnchor,
}

impl ViewportInteraction {
    /// Apply a measurement or grid command. Category toggles are not handled here.
    pub fn apply_command(&mut self, command: ViewportCommand) -> bool {
        match command {
            ViewportCommand::ToggleMode => {
                let enabled = self.session.toggle_mode();
                info!(
                    "Measure mode {}",
                    if enabled { "enabled" } else { "disabled" }
                );
                true
            }
            ViewportCommand::Cancel => {
                self.session.cancel();
                self.grid.hide();
                info!("Measurement cancelled");
                true
            }
            ViewportCommand::ToggleGrid => {
                let visible = self.grid.toggle_visibility();
                info!(
                    "Reference grid {}",
                    if visible { "shown" } else { "hidden" }
                );
                true
            }
            ViewportCommand::SetAxisLock(lock) => {
                let changed = self.session.set_axis_lock(lock);
                if changed {
                    info!("Axis lock set to {}", lock.as_str());
                }
                changed
            }
            ViewportCommand::ToggleCategory(_) => false,
        }
    }

    /// Project a pointer ray onto the plane the session currently measures on.
    pub fn project(&self, ray: &Ray3d) -> Option<Vec3> {
        self.session.reference_plane().intersect(ray)
    }

    /// Primary press at a projected point.
    ///
    /// With the grid anchored the measurement starts on the snapped grid axis,
    /// at the pressed height, and is locked to Y.
    pub fn primary_down(&mut self, point: Vec3, cell_size: f32) -> bool {
        if self.session.state() != MeasureState::Armed {
            return false;
        }
        if self.grid.is_anchored() && self.grid.is_visible() {
            let origin = self.grid.snapped_origin(cell_size);
            let start = Vec3::new(origin.x, point.y, origin.z);
            info!("Measuring height from y = {:.2}", start.y);
            self.session.begin_with_lock(start, AxisLock::Y)
        } else {
            self.session.begin(point)
        }
    }

    pub fn secondary_down(&mut self, point: Vec3) -> bool {
        let anchored = self.grid.anchor(point);
        if anchored {
            info!("Reference grid anchored at ({:.2}, {:.2})", point.x, point.z);
        }
        anchored
    }

    pub fn pointer_moved(&mut self, point: Vec3) -> bool {
        let tracked = self.grid.track(point);
        let updated = self.session.update_end(point);
        tracked || updated
    }

    pub fn primary_up(&mut self) -> bool {
        self.session.release()
    }

    /// Route one pointer event. Rays that miss the reference plane change nothing.
    pub fn handle_pointer(&mut self, input: &PointerInput, cell_size: f32) -> bool {
        match input {
            PointerInput::Down { button, ray } => {
                let Some(point) = self.project(ray) else {
                    return false;
                };
                match button {
                    PointerButton::Primary => self.primary_down(point, cell_size),
                    PointerButton::Secondary => self.secondary_down(point),
                }
            }
            PointerInput::Move { ray } => match self.project(ray) {
                Some(point) => self.pointer_moved(point),
                None => false,
            },
            PointerInput::Up { button } => match button {
                PointerButton::Primary => self.primary_up(),
                PointerButton::Secondary => false,
            },
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed() -> ViewportInteraction {
        let mut interaction = ViewportInteraction::default();
        interaction.apply_command(ViewportCommand::ToggleMode);
        interaction
    }

    fn down_ray(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 10.0, z), Dir3::NEG_Y)
    }

    #[test]
    fn press_release_keeps_single_point() {
        let mut interaction = armed();
        assert!(interaction.primary_down(Vec3::new(1.0, 2.0, 3.0), 1.0));
        assert!(interaction.primary_up());

        let session = &interaction.session;
        assert_eq!(session.start_point(), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(session.end_point(), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(session.distance_label().as_deref(), Some("0.000"));
    }

    #[test]
    fn anchored_grid_starts_height_measurement() {
        let mut interaction = armed();
        interaction.apply_command(ViewportCommand::ToggleGrid);
        interaction.secondary_down(Vec3::new(2.6, 0.0, -0.4));

        assert!(interaction.primary_down(Vec3::new(7.0, 1.5, 7.0), 1.0));
        assert_eq!(
            interaction.session.start_point(),
            Some(Vec3::new(3.0, 1.5, 0.0))
        );
        assert_eq!(interaction.session.axis_lock(), AxisLock::Y);

        interaction.pointer_moved(Vec3::new(9.0, 4.0, 9.0));
        assert_eq!(
            interaction.session.end_point(),
            Some(Vec3::new(3.0, 4.0, 0.0))
        );
    }

    #[test]
    fn cancel_hides_and_unanchors_grid() {
        let mut interaction = armed();
        interaction.apply_command(ViewportCommand::ToggleGrid);
        interaction.secondary_down(Vec3::ONE);
        interaction.primary_down(Vec3::ONE, 1.0);

        interaction.apply_command(ViewportCommand::Cancel);
        assert!(!interaction.grid.is_visible());
        assert!(!interaction.grid.is_anchored());
        assert!(!interaction.session.is_measuring());
        assert!(interaction.session.is_mode_enabled());
    }

    #[test]
    fn grid_toggle_works_while_idle() {
        let mut interaction = ViewportInteraction::default();
        assert!(interaction.apply_command(ViewportCommand::ToggleGrid));
        assert!(interaction.grid.is_visible());
        assert!(!interaction.apply_command(ViewportCommand::SetAxisLock(AxisLock::X)));
    }

    #[test]
    fn pointer_rays_drive_the_session() {
        let mut interaction = armed();
        let down = PointerInput::Down {
            button: PointerButton::Primary,
            ray: down_ray(0.0, 0.0),
        };
        assert!(interaction.handle_pointer(&down, 1.0));

        let moved = PointerInput::Move {
            ray: down_ray(3.0, 4.0),
        };
        assert!(interaction.handle_pointer(&moved, 1.0));
        assert_eq!(interaction.session.distance_label().as_deref(), Some("5.000"));

        let up = PointerInput::Up {
            button: PointerButton::Primary,
        };
        assert!(interaction.handle_pointer(&up, 1.0));
        assert_eq!(interaction.session.state(), MeasureState::Armed);
    }

    #[test]
    fn missed_projection_changes_nothing() {
        let mut interaction = armed();
        let parallel = PointerInput::Down {
            button: PointerButton::Primary,
            ray: Ray3d::new(Vec3::Y, Dir3::X),
        };
        assert!(!interaction.handle_pointer(&parallel, 1.0));
        assert_eq!(interaction, armed());
    }

    #[test]
    fn moving_tracks_unanchored_grid() {
        let mut interaction = ViewportInteraction::default();
        interaction.apply_command(ViewportCommand::ToggleGrid);
        interaction.handle_pointer(
            &PointerInput::Move {
                ray: down_ray(4.4, -2.6),
            },
            1.0,
        );
        assert_eq!(interaction.grid.quadrant(1.0), (4, -3));
    }
}
