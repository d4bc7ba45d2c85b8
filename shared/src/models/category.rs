//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity (`/categorias`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "ID_Categoria")]
    pub id: i64,
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Create / update category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(rename = "Nombre")]
    pub name: String,
}
