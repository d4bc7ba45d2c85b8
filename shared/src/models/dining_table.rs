//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::room::RoomRef;

/// Dining table entity (`/mesas`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(rename = "ID_Mesa")]
    pub id: i64,
    #[serde(rename = "Numero_mesa")]
    pub number: i64,
    #[serde(rename = "ID_Salon", default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    #[serde(rename = "salon", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomRef>,
}

impl DiningTable {
    /// Room label for listings: joined room name, else the raw room id, else "-"
    pub fn room_label(&self) -> String {
        match (&self.room, self.room_id) {
            (Some(room), _) => room.name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// Table as embedded in an order (`pedido.mesa`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(rename = "Numero_mesa")]
    pub number: i64,
    #[serde(rename = "salon", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomRef>,
}

/// Create / update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableInput {
    #[serde(rename = "numero_mesa", alias = "Numero_mesa")]
    pub number: i64,
    #[serde(rename = "ID_Salon")]
    pub room_id: i64,
}
