//! Preparation Area Model (bar, grill, kitchen…)

use serde::{Deserialize, Serialize};

/// Area name the bar board filters on
pub const AREA_BAR: &str = "Barra";
/// Area name the grill board filters on
pub const AREA_GRILL: &str = "Plancha";

/// Area entity (`/areas`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    #[serde(rename = "ID_Area")]
    pub id: i64,
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Area as embedded in a product (`producto.area`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Create / update area payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaInput {
    #[serde(rename = "Nombre")]
    pub name: String,
}
