use serde::Serialize;

use crate::engine::assets::analysis::{BimElement, StatusCode};

/// Per-type progress counts for the summary chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub type_tag: String,
    pub label: String,
    pub total: u32,
    pub completo: u32,
    pub parcial: u32,
}

/// Chart label for an IFC type tag: the first `Ifc` is dropped.
pub fn chart_label(type_tag: &str) -> String {
    type_tag.replacen("Ifc", "", 1)
}

/// Group elements by type tag, keeping the order in which each type first appears.
pub fn summarize_by_type(elements: &[BimElement]) -> Vec<TypeSummary> {
    let mut groups: Vec<TypeSummary> = Vec::new();

    for element in elements {
        let index = match groups.iter().position(|g| g.type_tag == element.type_tag) {
            Some(index) => index,
            None => {
                groups.push(TypeSummary {
                    type_tag: element.type_tag.clone(),
                    label: chart_label(&element.type_tag),
                    total: 0,
                    completo: 0,
                    parcial: 0,
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        group.total += 1;
        match element.status_code() {
            StatusCode::Completo => group.completo += 1,
            StatusCode::Parcial => group.parcial += 1,
            StatusCode::Iniciado | StatusCode::Ausente => {}
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_first_seen_order() {
        let elements = vec![
            BimElement::new("1", "IfcWall", StatusCode::Completo),
            BimElement::new("2", "IfcColumn", StatusCode::Parcial),
            BimElement::new("3", "IfcWall", StatusCode::Parcial),
            BimElement::new("4", "IfcWall", StatusCode::Ausente),
            BimElement::new("5", "IfcSlab", StatusCode::Iniciado),
        ];

        let summary = summarize_by_type(&elements);
        let tags: Vec<&str> = summary.iter().map(|s| s.type_tag.as_str()).collect();
        assert_eq!(tags, vec!["IfcWall", "IfcColumn", "IfcSlab"]);

        assert_eq!(summary[0].total, 3);
        assert_eq!(summary[0].completo, 1);
        assert_eq!(summary[0].parcial, 1);
        assert_eq!(summary[0].label, "Wall");
        assert_eq!(summary[2].completo + summary[2].parcial, 0);
    }

    #[test]
    fn empty_list_has_no_groups() {
        assert!(summarize_by_type(&[]).is_empty());
    }

    #[test]
    fn label_strips_first_ifc_only() {
        assert_eq!(chart_label("IfcBeam"), "Beam");
        assert_eq!(chart_label("Beam"), "Beam");
        assert_eq!(chart_label("IfcIfcBeam"), "IfcBeam");
    }
}
