use bevy::prelude::*;

/// Viewer lifecycle. Interaction input is only processed while `Inspecting`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for the first analysis result.
    #[default]
    Loading,
    /// An analysis result is applied and the measurement view is live.
    Inspecting,
}

/// Per-frame ordering of viewport work inside `Update`.
///
/// Input is turned into commands and pointer events first, commands mutate the
/// interaction and visibility state next, and scene entities are synced last.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportSet {
    Input,
    Interaction,
    Sync,
}

#[derive(Component)]
pub struct FpsText;
