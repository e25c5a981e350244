use bevy::prelude::*;
use constants::render_settings::{ELEMENT_BOX_FALLBACK_HEX, ELEMENT_POINTS_FALLBACK_HEX};
use serde::{Deserialize, Serialize};

use super::bounds::{BoundingBox, BoxGeometry};
use crate::engine::core::error::{ViewerError, ViewerResult};

/// Construction progress category assigned by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusCode {
    Completo,
    Parcial,
    Iniciado,
    Ausente,
}

impl StatusCode {
    pub const ALL: [StatusCode; 4] = [
        StatusCode::Completo,
        StatusCode::Parcial,
        StatusCode::Iniciado,
        StatusCode::Ausente,
    ];

    /// Convert string identifier to status code for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "COMPLETO" => Some(Self::Completo),
            "PARCIAL" => Some(Self::Parcial),
            "INICIADO" => Some(Self::Iniciado),
            "AUSENTE" => Some(Self::Ausente),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> ViewerResult<Self> {
        Self::from_string(s).ok_or_else(|| ViewerError::UnknownStatus(s.to_string()))
    }

    /// Wire identifier used by the analysis service and the frontend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completo => "COMPLETO",
            Self::Parcial => "PARCIAL",
            Self::Iniciado => "INICIADO",
            Self::Ausente => "AUSENTE",
        }
    }
}

/// Resolved status with its display text and colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDescriptor {
    pub code: StatusCode,
    #[serde(default)]
    pub emoji: String,
    #[serde(default, rename = "texto")]
    pub text: String,
    #[serde(default, rename = "cor")]
    pub colour: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    #[serde(default)]
    pub z: Option<f32>,
}

/// Planned versus executed element heights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDimensions {
    #[serde(default, rename = "executado")]
    pub executed: Option<AxisExtent>,
    #[serde(default, rename = "planejado")]
    pub planned: Option<AxisExtent>,
    #[serde(default, rename = "progresso")]
    pub progress: Option<AxisExtent>,
}

/// One building-model component with its progress status and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimElement {
    #[serde(default)]
    pub guid: String,
    #[serde(default, rename = "nome")]
    pub name: String,
    #[serde(default, rename = "tipo")]
    pub type_tag: String,
    pub status: StatusDescriptor,
    #[serde(default, rename = "pontos")]
    pub point_count: u64,
    #[serde(default, rename = "cobertura_vertical")]
    pub vertical_coverage: Option<f32>,
    #[serde(default, rename = "dimensoes")]
    pub dimensions: Option<ElementDimensions>,
    #[serde(default)]
    pub json_file: Option<String>,
    #[serde(default)]
    pub json_url: Option<String>,
    #[serde(default)]
    pub ply_file: Option<String>,
    // Kept untyped so one malformed box only drops its own element.
    #[serde(default)]
    bbox_normalized: Option<serde_json::Value>,
    #[serde(default)]
    bbox: Option<serde_json::Value>,
}

impl BimElement {
    pub fn new(guid: impl Into<String>, type_tag: impl Into<String>, code: StatusCode) -> Self {
        Self {
            guid: guid.into(),
            name: String::new(),
            type_tag: type_tag.into(),
            status: StatusDescriptor {
                code,
                emoji: String::new(),
                text: code.as_str().to_string(),
                colour: String::new(),
            },
            point_count: 0,
            vertical_coverage: None,
            dimensions: None,
            json_file: None,
            json_url: None,
            ply_file: None,
            bbox_normalized: None,
            bbox: None,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bbox_normalized = serde_json::to_value(bounds).ok();
        self
    }

    pub fn with_point_cloud(mut self, reference: impl Into<String>) -> Self {
        self.json_file = Some(reference.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status.code
    }

    /// Point cloud resource reference, if the element has one.
    pub fn point_cloud_ref(&self) -> Option<&str> {
        [self.json_file.as_deref(), self.json_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|reference| !reference.trim().is_empty())
    }

    /// Parse the element bounds, preferring `bbox_normalized` over `bbox`.
    pub fn bounding_box(&self) -> ViewerResult<BoundingBox> {
        let raw = [self.bbox_normalized.as_ref(), self.bbox.as_ref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_null())
            .ok_or_else(|| ViewerError::malformed_bbox(&self.guid, "missing"))?;

        let bounds = serde_json::from_value::<BoundingBox>(raw.clone())
            .map_err(|err| ViewerError::malformed_bbox(&self.guid, err.to_string()))?;

        if !bounds.is_finite() {
            return Err(ViewerError::malformed_bbox(&self.guid, "non-finite value"));
        }
        Ok(bounds)
    }

    /// Renderable box, `Ok(None)` when the box is degenerate.
    pub fn render_geometry(&self) -> ViewerResult<Option<BoxGeometry>> {
        Ok(self.bounding_box()?.to_geometry())
    }

    /// Wireframe colour from the status descriptor.
    pub fn box_colour(&self) -> Color {
        parse_hex_colour(&self.status.colour, ELEMENT_BOX_FALLBACK_HEX)
    }

    /// Point colour from the status descriptor.
    pub fn points_colour(&self) -> Color {
        parse_hex_colour(&self.status.colour, ELEMENT_POINTS_FALLBACK_HEX)
    }
}

/// Parse a `#rrggbb` colour, falling back when empty or invalid.
pub fn parse_hex_colour(hex: &str, fallback: &str) -> Color {
    Srgba::hex(hex)
        .or_else(|_| Srgba::hex(fallback))
        .map(Color::from)
        .unwrap_or(Color::WHITE)
}

/// Overall floor statistics (`estatisticas`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStatistics {
    #[serde(default)]
    pub total: u32,
    #[serde(default, rename = "completos")]
    pub complete: u32,
    #[serde(default, rename = "parciais")]
    pub partial: u32,
    #[serde(default, rename = "iniciados")]
    pub started: u32,
    #[serde(default, rename = "ausentes")]
    pub absent: u32,
    #[serde(default, rename = "progresso_geral")]
    pub overall_progress: f32,
}

/// Summary block of the legacy result shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySummary {
    #[serde(default)]
    pub total_elements: u32,
    #[serde(default)]
    pub executed_elements: u32,
    #[serde(default)]
    pub progress_percentage: f32,
    #[serde(default)]
    pub status_by_category: Option<serde_json::Value>,
    #[serde(default)]
    pub risks_detected: Option<Vec<String>>,
}

/// Analysis result document, in either the current (`resultados`/`estatisticas`)
/// or the legacy (`items`/`summary`) shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Asset, TypePath)]
pub struct AnalysisResult {
    #[serde(default, rename = "pavimento")]
    pub floor_name: Option<String>,
    #[serde(default)]
    pub floor_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "estatisticas")]
    pub statistics: Option<ProgressStatistics>,
    #[serde(default)]
    pub summary: Option<LegacySummary>,
    #[serde(default)]
    pub items: Option<Vec<BimElement>>,
    #[serde(default, rename = "resultados")]
    pub results: Option<Vec<BimElement>>,
}

impl AnalysisResult {
    /// Element list, current shape first.
    pub fn elements(&self) -> &[BimElement] {
        self.results
            .as_deref()
            .or(self.items.as_deref())
            .unwrap_or(&[])
    }

    /// Floor statistics; the legacy summary only provides total and percentage.
    pub fn progress_statistics(&self) -> ProgressStatistics {
        if let Some(statistics) = &self.statistics {
            return statistics.clone();
        }
        let summary = self.summary.clone().unwrap_or_default();
        ProgressStatistics {
            total: summary.total_elements,
            overall_progress: summary.progress_percentage,
            ..default()
        }
    }
}
