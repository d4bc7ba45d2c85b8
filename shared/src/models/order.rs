//! Order Model (pedido + detalle)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::customer::Customer;
use super::dining_table::TableRef;
use super::product::ProductRef;
use crate::types::{DetailId, ItemStatus, OrderId, ProductId};

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "ID_Pedido")]
    pub id: OrderId,
    #[serde(rename = "Fecha_hora", default, skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
    #[serde(rename = "ID_Estado", default)]
    pub status: ItemStatus,
    #[serde(rename = "ID_Mesa", default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(rename = "mesa", default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableRef>,
    #[serde(rename = "detalles", default)]
    pub lines: Vec<OrderLine>,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl Order {
    /// Table label for station tickets
    pub fn table_label(&self) -> Option<String> {
        self.table.as_ref().map(|t| t.number.to_string())
    }

    /// Room label for station tickets
    pub fn room_label(&self) -> Option<String> {
        self.table
            .as_ref()
            .and_then(|t| t.room.as_ref())
            .map(|r| r.name.clone())
    }
}

/// Order line (detalle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "ID_Detalle")]
    pub id: DetailId,
    #[serde(rename = "ID_Producto")]
    pub product_id: ProductId,
    #[serde(rename = "Cantidad", default = "default_quantity")]
    pub quantity: u32,
    #[serde(rename = "Comentario", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "ID_Estado", default)]
    pub status: ItemStatus,
    #[serde(rename = "producto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
}

fn default_quantity() -> u32 {
    1
}

impl OrderLine {
    /// Product display name, falls back when the back-end did not join it
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown product")
    }
}

/// Grouped snapshot from `/pedidos/agrupados`: room name → table number → orders
pub type GroupedOrders = BTreeMap<String, BTreeMap<String, Vec<Order>>>;

/// New order payload (`POST /pedidos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(rename = "Fecha_hora")]
    pub placed_at: DateTime<Utc>,
    #[serde(rename = "ID_Estado")]
    pub status: ItemStatus,
    #[serde(rename = "ID_Mesa")]
    pub table_id: i64,
    #[serde(rename = "detalles")]
    pub lines: Vec<NewOrderLine>,
}

/// New order line, one per unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    #[serde(rename = "Cantidad")]
    pub quantity: u32,
    #[serde(rename = "Comentario")]
    pub comment: String,
    #[serde(rename = "ID_Estado")]
    pub status: ItemStatus,
    #[serde(rename = "ID_Producto")]
    pub product_id: ProductId,
}

/// Status change payload (`PUT /detalles/:id/estado`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStatusUpdate {
    #[serde(rename = "estado")]
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_station_order() {
        let json = r#"{
            "ID_Pedido": 12,
            "Fecha_hora": "2024-05-01T19:30:00.000Z",
            "ID_Estado": 1,
            "mesa": {"Numero_mesa": 5, "salon": {"Nombre": "Terraza"}},
            "detalles": [{
                "ID_Detalle": 90,
                "ID_Producto": 7,
                "Cantidad": 2,
                "Comentario": "sin hielo;con limon",
                "ID_Estado": 1,
                "producto": {"Nombre": "Pisco Sour", "area": {"Nombre": "Barra"}}
            }]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId(12));
        assert_eq!(order.table_label().as_deref(), Some("5"));
        assert_eq!(order.room_label().as_deref(), Some("Terraza"));
        let line = &order.lines[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.as_ref().and_then(|p| p.area_name()), Some("Barra"));
    }

    #[test]
    fn line_defaults() {
        let line: OrderLine =
            serde_json::from_str(r#"{"ID_Detalle":1,"ID_Producto":3}"#).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.status, ItemStatus::PENDING);
        assert_eq!(line.product_name(), "Unknown product");
    }
}
