//! Customer Model (cliente)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::OrderId;

/// Identity document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// National identity document, 8 digits
    #[default]
    Dni,
    /// Tax payer number, 11 digits
    Ruc,
}

impl DocumentType {
    /// Required number of digits
    pub fn digits(self) -> usize {
        match self {
            DocumentType::Dni => 8,
            DocumentType::Ruc => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Dni => "DNI",
            DocumentType::Ruc => "RUC",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DNI" => Ok(DocumentType::Dni),
            "RUC" => Ok(DocumentType::Ruc),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

/// Customer attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "TipoDoc")]
    pub doc_type: DocumentType,
    #[serde(rename = "Documento")]
    pub document: String,
    #[serde(rename = "Nombre", default)]
    pub name: String,
}

/// Customer lookup result (`/clientes/buscar`)
///
/// The lookup service answers with either `Nombre` or `nombre`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLookup {
    #[serde(rename = "Nombre", alias = "nombre")]
    pub name: String,
}

/// Capture payload (`POST /clientes/capturar`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCapture {
    #[serde(rename = "tipoDoc")]
    pub doc_type: DocumentType,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "pedidoId")]
    pub order_id: OrderId,
}
