//! Viewport composition: camera suspension and the element render list.
//!
//! Visible elements are drawn as status-coloured wireframe boxes with their
//! scanned points. Free camera orbiting is paused while a measurement drag is
//! in progress and resumes on release.

/// Visible, renderable elements with their loaded point clouds.
pub mod render_list;

/// Scene entities for the render list, rebuilt on change.
pub mod visuals;

use bevy::prelude::*;

use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::ViewportSet;
use crate::tools::measure::interaction::ViewportInteraction;
use visuals::sync_element_visuals;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (suspend_camera_while_measuring, camera_controller).chain(),
                sync_element_visuals,
            )
                .in_set(ViewportSet::Sync),
        );
    }
}

/// Orbit controls are enabled exactly when no measurement drag is active.
pub fn suspend_camera_while_measuring(
    interaction: Res<ViewportInteraction>,
    mut camera: ResMut<ViewportCamera>,
) {
    let enabled = !interaction.session.is_measuring();
    if camera.controls_enabled != enabled {
        camera.controls_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::commands::ViewportCommand;

    #[test]
    fn camera_pauses_during_drag() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewportInteraction>()
            .init_resource::<ViewportCamera>()
            .add_systems(Update, suspend_camera_while_measuring);

        {
            let mut interaction = app.world_mut().resource_mut::<ViewportInteraction>();
            interaction.apply_command(ViewportCommand::ToggleMode);
            interaction.primary_down(Vec3::ZERO, 1.0);
        }
        app.update();
        assert!(!app.world().resource::<ViewportCamera>().controls_enabled);

        app.world_mut()
            .resource_mut::<ViewportInteraction>()
            .primary_up();
        app.update();
        assert!(app.world().resource::<ViewportCamera>().controls_enabled);
    }
}
