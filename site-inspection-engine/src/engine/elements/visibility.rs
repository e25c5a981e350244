use std::collections::HashSet;

use bevy::prelude::*;

use crate::engine::assets::analysis::{BimElement, StatusCode};

/// Category and item level visibility overrides for one analysis result.
///
/// Precedence when resolving an element: forced-visible wins, then a hidden
/// category hides, then an individually hidden item hides.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct VisibilitySets {
    hidden_categories: HashSet<StatusCode>,
    hidden_items: HashSet<String>,
    forced_visible_items: HashSet<String>,
}

/// Which override an item toggle touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemToggleEffect {
    /// Category hidden: the item was added to or removed from the forced-visible set.
    Forced { visible: bool },
    /// Category visible: the item was added to or removed from the hidden set.
    Hidden { hidden: bool },
}

impl VisibilitySets {
    pub fn is_visible(&self, guid: &str, status: StatusCode) -> bool {
        if self.forced_visible_items.contains(guid) {
            return true;
        }
        if self.hidden_categories.contains(&status) {
            return false;
        }
        !self.hidden_items.contains(guid)
    }

    pub fn is_element_visible(&self, element: &BimElement) -> bool {
        self.is_visible(&element.guid, element.status_code())
    }

    pub fn is_category_hidden(&self, status: StatusCode) -> bool {
        self.hidden_categories.contains(&status)
    }

    pub fn hide_category(&mut self, status: StatusCode) {
        self.hidden_categories.insert(status);
    }

    /// Un-hide a category and drop the forced-visible overrides of its members.
    pub fn show_category(&mut self, status: StatusCode, elements: &[BimElement]) {
        self.hidden_categories.remove(&status);
        for element in elements.iter().filter(|e| e.status_code() == status) {
            self.forced_visible_items.remove(&element.guid);
        }
    }

    /// Flip a category. Returns true when the category is now hidden.
    pub fn toggle_category(&mut self, status: StatusCode, elements: &[BimElement]) -> bool {
        if self.is_category_hidden(status) {
            self.show_category(status, elements);
            false
        } else {
            self.hide_category(status);
            true
        }
    }

    /// Flip the forced-visible override of an item whose category is hidden.
    pub fn override_in_hidden_category(&mut self, guid: &str) -> bool {
        flip(&mut self.forced_visible_items, guid)
    }

    /// Flip the individual hide of an item whose category is visible.
    pub fn toggle_item_hidden(&mut self, guid: &str) -> bool {
        flip(&mut self.hidden_items, guid)
    }

    /// Item toggle that picks the override from the current category state.
    pub fn toggle_item(&mut self, guid: &str, status: StatusCode) -> ItemToggleEffect {
        if self.is_category_hidden(status) {
            ItemToggleEffect::Forced {
                visible: self.override_in_hidden_category(guid),
            }
        } else {
            ItemToggleEffect::Hidden {
                hidden: self.toggle_item_hidden(guid),
            }
        }
    }

    pub fn hidden_categories(&self) -> impl Iterator<Item = StatusCode> + '_ {
        StatusCode::ALL
            .into_iter()
            .filter(|code| self.hidden_categories.contains(code))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Toggle membership, returning whether `guid` is now in the set.
fn flip(set: &mut HashSet<String>, guid: &str) -> bool {
    if set.remove(guid) {
        false
    } else {
        set.insert(guid.to_string());
        true
    }
}

/// Visibility change requested by the keyboard or the frontend.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum VisibilityCommand {
    ToggleCategory(StatusCode),
    ToggleItem { guid: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<BimElement> {
        vec![
            BimElement::new("a", "IfcWall", StatusCode::Completo),
            BimElement::new("b", "IfcWall", StatusCode::Completo),
            BimElement::new("c", "IfcColumn", StatusCode::Parcial),
        ]
    }

    #[test]
    fn everything_visible_by_default() {
        let sets = VisibilitySets::default();
        for element in floor() {
            assert!(sets.is_element_visible(&element));
        }
    }

    #[test]
    fn forced_item_survives_hidden_category() {
        let elements = floor();
        let mut sets = VisibilitySets::default();

        sets.toggle_category(StatusCode::Completo, &elements);
        assert!(!sets.is_visible("a", StatusCode::Completo));
        assert!(!sets.is_visible("b", StatusCode::Completo));

        let effect = sets.toggle_item("a", StatusCode::Completo);
        assert_eq!(effect, ItemToggleEffect::Forced { visible: true });
        assert!(sets.is_visible("a", StatusCode::Completo));
        assert!(!sets.is_visible("b", StatusCode::Completo));

        sets.toggle_category(StatusCode::Completo, &elements);
        assert!(sets.is_visible("a", StatusCode::Completo));
        assert!(sets.is_visible("b", StatusCode::Completo));
        assert!(sets.forced_visible_items.is_empty());
    }

    #[test]
    fn hide_then_show_restores_item_state() {
        let elements = floor();
        let mut sets = VisibilitySets::default();
        sets.toggle_item("c", StatusCode::Parcial);
        let before: Vec<bool> = elements.iter().map(|e| sets.is_element_visible(e)).collect();

        sets.hide_category(StatusCode::Parcial);
        sets.show_category(StatusCode::Parcial, &elements);

        let after: Vec<bool> = elements.iter().map(|e| sets.is_element_visible(e)).collect();
        assert_eq!(before, after);
        assert!(!sets.is_visible("c", StatusCode::Parcial));
    }

    #[test]
    fn item_toggle_in_visible_category_hides() {
        let mut sets = VisibilitySets::default();
        assert_eq!(
            sets.toggle_item("c", StatusCode::Parcial),
            ItemToggleEffect::Hidden { hidden: true }
        );
        assert!(!sets.is_visible("c", StatusCode::Parcial));
        assert_eq!(
            sets.toggle_item("c", StatusCode::Parcial),
            ItemToggleEffect::Hidden { hidden: false }
        );
        assert!(sets.is_visible("c", StatusCode::Parcial));
    }

    #[test]
    fn forced_visible_beats_individual_hide() {
        let elements = floor();
        let mut sets = VisibilitySets::default();
        sets.toggle_item_hidden("a");
        sets.toggle_category(StatusCode::Completo, &elements);
        sets.override_in_hidden_category("a");
        assert!(sets.is_visible("a", StatusCode::Completo));
    }

    #[test]
    fn hidden_categories_are_listed_in_status_order() {
        let elements = floor();
        let mut sets = VisibilitySets::default();
        sets.toggle_category(StatusCode::Ausente, &elements);
        sets.toggle_category(StatusCode::Completo, &elements);
        let hidden: Vec<_> = sets.hidden_categories().collect();
        assert_eq!(hidden, vec![StatusCode::Completo, StatusCode::Ausente]);

        sets.reset();
        assert_eq!(sets.hidden_categories().count(), 0);
    }
}
