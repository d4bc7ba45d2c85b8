//! Room Model (salón)

use serde::{Deserialize, Serialize};

/// Room entity (`/salones`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "ID_Salon")]
    pub id: i64,
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Room as embedded in a table (`mesa.salon`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Create / update room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInput {
    #[serde(rename = "Nombre")]
    pub name: String,
}
