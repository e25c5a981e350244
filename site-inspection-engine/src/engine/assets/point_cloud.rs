use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::error::{ViewerError, ViewerResult};

/// Scanned points for one element: a flat `[x, y, z, x, y, z, ...]` sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Asset, TypePath)]
pub struct PointCloudPayload {
    #[serde(default)]
    pub positions: Vec<f32>,
}

impl PointCloudPayload {
    /// Group the flat sequence into world positions.
    pub fn to_positions(&self) -> ViewerResult<Vec<Vec3>> {
        if self.positions.len() % 3 != 0 {
            return Err(ViewerError::MalformedPointPayload(format!(
                "{} values do not form position triples",
                self.positions.len()
            )));
        }
        if let Some(index) = self.positions.iter().position(|v| !v.is_finite()) {
            return Err(ViewerError::MalformedPointPayload(format!(
                "non-finite value at index {index}"
            )));
        }

        Ok(self
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_triples() {
        let payload: PointCloudPayload =
            serde_json::from_str(r#"{ "positions": [0, 1, 2, 3.5, 4, 5] }"#).unwrap();
        let points = payload.to_positions().unwrap();
        assert_eq!(points, vec![Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.5, 4.0, 5.0)]);
    }

    #[test]
    fn missing_positions_is_empty() {
        let payload: PointCloudPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.to_positions().unwrap().is_empty());
    }

    #[test]
    fn rejects_partial_triples() {
        let payload = PointCloudPayload {
            positions: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert!(matches!(
            payload.to_positions(),
            Err(ViewerError::MalformedPointPayload(_))
        ));
    }
}
