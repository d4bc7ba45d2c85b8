//! Orders and line items

use serde::Serialize;
use serde::de::IgnoredAny;
use shared::board::Station;
use shared::models::{GroupedOrders, LineStatusUpdate, NewOrder, Order};
use shared::types::{DetailId, ItemStatus, OrderId, TableNumber};

use super::PosApi;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

#[derive(Serialize)]
struct TableQuery<'a> {
    #[serde(rename = "numero")]
    number: &'a str,
    #[serde(rename = "salon")]
    room: &'a str,
}

impl<H: HttpClient> PosApi<H> {
    /// Active orders grouped by room name then table number
    pub async fn grouped_orders(&self) -> ClientResult<GroupedOrders> {
        self.http.get("/pedidos/agrupados").await
    }

    /// Orders carrying products of one preparation station
    pub async fn station_orders(&self, station: Station) -> ClientResult<Vec<Order>> {
        self.http.get(station.path()).await
    }

    pub async fn submit_order(&self, order: &NewOrder) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("/pedidos", order).await?;
        tracing::info!(table_id = order.table_id, lines = order.lines.len(), "Order submitted");
        Ok(())
    }

    /// `PUT /detalles/:id/estado`
    pub async fn set_line_status(&self, detail_id: DetailId, status: ItemStatus) -> ClientResult<()> {
        let body = LineStatusUpdate { status };
        let _: IgnoredAny = self
            .http
            .put(&format!("/detalles/{detail_id}/estado"), &body)
            .await?;
        tracing::debug!(%detail_id, %status, "Line status updated");
        Ok(())
    }

    /// Active order of a table, looked up by table number only
    pub async fn active_order_by_table(&self, number: &TableNumber) -> ClientResult<Order> {
        let order: Option<Order> = self.http.get(&format!("/pedidos/por-mesa/{number}")).await?;
        order.ok_or_else(|| ClientError::NotFound(format!("no active order for table {number}")))
    }

    /// Active order of a table inside a given room
    pub async fn active_order_at(&self, number: &TableNumber, room: &str) -> ClientResult<Order> {
        let query = TableQuery {
            number: number.as_str(),
            room,
        };
        let order: Option<Order> = self.http.get_query("/pedidos/por-mesa", &query).await?;
        order.ok_or_else(|| {
            ClientError::NotFound(format!("no active order for table {number} in {room}"))
        })
    }

    pub async fn delete_order(&self, id: OrderId) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/pedidos/{id}")).await?;
        tracing::info!(%id, "Order deleted");
        Ok(())
    }
}
