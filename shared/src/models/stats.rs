//! Order statistics (`/estadisticas/pedidos`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderStats {
    #[serde(rename = "totalPedidos", default)]
    pub total_orders: u64,
    #[serde(rename = "totalProductosVendidos", default)]
    pub total_products_sold: u64,
}
