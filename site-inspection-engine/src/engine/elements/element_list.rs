use bevy::prelude::*;

use super::summary::{TypeSummary, summarize_by_type};
use super::visibility::{ItemToggleEffect, VisibilityCommand, VisibilitySets};
use crate::engine::assets::analysis::{AnalysisResult, BimElement, ProgressStatistics};
use crate::rpc::web_rpc::WebRpcInterface;

/// Elements of the analysis result currently on screen. Replaced wholesale.
#[derive(Resource, Debug, Clone, Default)]
pub struct ElementList {
    pub floor_name: Option<String>,
    pub elements: Vec<BimElement>,
    pub statistics: ProgressStatistics,
}

impl ElementList {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            floor_name: result.floor_name.clone(),
            elements: result.elements().to_vec(),
            statistics: result.progress_statistics(),
        }
    }

    pub fn find(&self, guid: &str) -> Option<&BimElement> {
        self.elements.iter().find(|e| e.guid == guid)
    }

    pub fn summary_by_type(&self) -> Vec<TypeSummary> {
        summarize_by_type(&self.elements)
    }

    pub fn visible_count(&self, visibility: &VisibilitySets) -> usize {
        self.elements
            .iter()
            .filter(|e| visibility.is_element_visible(e))
            .count()
    }
}

/// Apply queued visibility commands against the current element list.
pub fn apply_visibility_commands(
    mut events: EventReader<VisibilityCommand>,
    elements: Res<ElementList>,
    mut visibility: ResMut<VisibilitySets>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for command in events.read() {
        match command {
            VisibilityCommand::ToggleCategory(status) => {
                let hidden = visibility.toggle_category(*status, &elements.elements);
                info!(
                    "Category {} {}",
                    status.as_str(),
                    if hidden { "hidden" } else { "shown" }
                );
            }
            VisibilityCommand::ToggleItem { guid } => {
                let Some(element) = elements.find(guid) else {
                    warn!("Visibility toggle for unknown element {}", guid);
                    continue;
                };
                match visibility.toggle_item(guid, element.status_code()) {
                    ItemToggleEffect::Forced { visible } => {
                        debug!("Element {} forced visible: {}", guid, visible)
                    }
                    ItemToggleEffect::Hidden { hidden } => {
                        debug!("Element {} hidden: {}", guid, hidden)
                    }
                }
            }
        }

        rpc_interface.send_notification(
            "visibility_changed",
            serde_json::json!({
                "hidden_categories": visibility
                    .hidden_categories()
                    .map(|code| code.as_str())
                    .collect::<Vec<_>>(),
                "visible_count": elements.visible_count(&visibility),
                "total": elements.elements.len(),
            }),
        );
    }
}
