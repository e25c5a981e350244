//! Element list, visibility filtering and per-type progress aggregation.
//!
//! The element list is replaced whenever a new analysis result is applied.
//! Visibility and summaries are derived from it on demand and never mutate it.

/// Current analysis elements and the system applying visibility commands.
pub mod element_list;

/// Per-type progress counts for the summary chart.
pub mod summary;

/// Category and item visibility overrides with forced-visible precedence.
pub mod visibility;

use bevy::prelude::*;

use crate::engine::core::app_state::ViewportSet;
use element_list::{ElementList, apply_visibility_commands};
use visibility::{VisibilityCommand, VisibilitySets};

pub struct ElementsPlugin;

impl Plugin for ElementsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ElementList>()
            .init_resource::<VisibilitySets>()
            .add_event::<VisibilityCommand>()
            .add_systems(
                Update,
                apply_visibility_commands.in_set(ViewportSet::Interaction),
            );
    }
}
