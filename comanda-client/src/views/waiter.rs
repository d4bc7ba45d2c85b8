//! Waiter board controller (`/mozovisual`)

use async_trait::async_trait;
use shared::board::{FloorBoard, Reaction};
use shared::message::{PreBillCustomer, PreBillRequest, PushEvent, names};
use shared::models::DocumentType;
use shared::BoardError;
use shared::types::OrderId;

use super::LiveView;
use crate::ClientResult;
use crate::api::PosApi;
use crate::http::HttpClient;
use crate::push::PushClient;

pub struct WaiterView<'a, H: HttpClient> {
    api: &'a PosApi<H>,
    board: FloorBoard,
    last_error: Option<String>,
}

impl<'a, H: HttpClient> WaiterView<'a, H> {
    pub fn new(api: &'a PosApi<H>) -> Self {
        Self {
            api,
            board: FloorBoard::new(),
            last_error: None,
        }
    }

    pub fn board(&self) -> &FloorBoard {
        &self.board
    }

    /// Filters and table selection
    pub fn board_mut(&mut self) -> &mut FloorBoard {
        &mut self.board
    }

    /// Message of the last failed fetch, cleared by the next good one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Attach a customer to the active order of the selected table
    pub async fn capture_customer(
        &mut self,
        doc_type: DocumentType,
        document: &str,
    ) -> ClientResult<OrderId> {
        let (room, number) = self
            .board
            .selected_table()
            .map(|(room, number)| (room.to_string(), number.clone()))
            .ok_or(BoardError::NoTableSelected)?;
        let order = self.api.active_order_at(&number, &room).await?;
        self.api
            .capture_customer(doc_type, document, order.id)
            .await?;
        self.refresh().await;
        Ok(order.id)
    }

    pub async fn delete_order(&mut self, id: OrderId) -> ClientResult<()> {
        self.api.delete_order(id).await?;
        self.refresh().await;
        Ok(())
    }

    /// Pre-bill of the selected table
    pub fn pre_bill(&self) -> ClientResult<PreBillRequest> {
        let (room, number) = self
            .board
            .selected_table()
            .ok_or(BoardError::NoTableSelected)?;
        let table = self
            .board
            .table(room, number)
            .ok_or_else(|| BoardError::NoSuchTable {
                room: room.to_string(),
                table: number.to_string(),
            })?;
        let customer = table.customer.as_ref().map(|c| PreBillCustomer {
            doc_type: c.doc_type,
            document: c.document.clone(),
            name: c.name.clone(),
        });
        Ok(PreBillRequest::from_lines(
            number.as_str(),
            room,
            &table.lines,
            customer,
        ))
    }

    /// Ask the print service for the selected table's pre-bill
    pub async fn print_pre_bill(&self, push: &PushClient) -> ClientResult<()> {
        let request = self.pre_bill()?;
        push.emit(names::PRINT_PRE_BILL, &request).await?;
        tracing::info!(table = %request.table, room = %request.room, "Pre-bill requested");
        Ok(())
    }
}

#[async_trait]
impl<'a, H: HttpClient> LiveView for WaiterView<'a, H> {
    async fn refresh(&mut self) -> bool {
        let ticket = self.board.begin_refresh();
        match self.api.grouped_orders().await {
            Ok(snapshot) => {
                self.last_error = None;
                self.board.complete_refresh(ticket, snapshot)
            }
            Err(e) => {
                tracing::warn!("Order board fetch failed: {e}");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn apply_event(&mut self, event: &PushEvent) -> Reaction {
        self.board.apply_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::Notification;
    use crate::views::testing::MockHttp;
    use serde_json::json;
    use shared::board::GroupKey;
    use shared::types::{DetailId, ItemStatus, ProductId, TableNumber};

    fn snapshot(status_of_91: i32) -> serde_json::Value {
        json!({
            "Terraza": {
                "5": [{
                    "ID_Pedido": 3,
                    "ID_Estado": 1,
                    "cliente": {"TipoDoc": "DNI", "Documento": "45678912", "Nombre": "ANA TORRES"},
                    "detalles": [
                        {"ID_Detalle": 90, "ID_Producto": 7, "Cantidad": 1, "ID_Estado": 1, "producto": {"Nombre": "Lomo saltado"}},
                        {"ID_Detalle": 91, "ID_Producto": 7, "Cantidad": 1, "ID_Estado": status_of_91, "producto": {"Nombre": "Lomo saltado"}},
                        {"ID_Detalle": 92, "ID_Producto": 4, "Cantidad": 2, "Comentario": "sin hielo", "ID_Estado": 1, "producto": {"Nombre": "Chicha morada"}}
                    ]
                }]
            }
        })
    }

    fn api() -> PosApi<MockHttp> {
        let http = MockHttp::new();
        http.respond("GET", "/pedidos/agrupados", snapshot(1));
        PosApi::new(http)
    }

    #[tokio::test]
    async fn refresh_loads_and_events_patch() {
        let api = api();
        let mut view = WaiterView::new(&api);
        assert!(view.refresh().await);

        let table = TableNumber::new("5");
        let changed = view
            .handle(&Notification::Event(PushEvent::ItemStatusChanged {
                detail_id: DetailId(91),
                status: ItemStatus::SERVED,
            }))
            .await;
        assert!(changed);
        let orders = view.board().table("Terraza", &table).unwrap();
        assert_eq!(orders.quantity_of(GroupKey::new(ProductId(7), ItemStatus::SERVED)), 1);
        assert_eq!(orders.quantity_of(GroupKey::new(ProductId(7), ItemStatus::PENDING)), 1);

        // Unknown ids change nothing
        let changed = view
            .handle(&Notification::Event(PushEvent::ItemRemoved {
                detail_id: DetailId(999),
            }))
            .await;
        assert!(!changed);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_state_and_records_error() {
        let api = api();
        let mut view = WaiterView::new(&api);
        view.refresh().await;
        let before = view.board().clone();

        api.http().respond("GET", "/pedidos/agrupados", json!("not a snapshot"));
        assert!(!view.refresh().await);
        assert!(view.last_error().is_some());
        assert_eq!(view.board().table("Terraza", &"5".into()), before.table("Terraza", &"5".into()));

        api.http().respond("GET", "/pedidos/agrupados", snapshot(2));
        assert!(view.refresh().await);
        assert!(view.last_error().is_none());
    }

    #[tokio::test]
    async fn delete_order_refetches_the_board() {
        let api = api();
        api.http().respond("DELETE", "/pedidos/3", json!({"message": "Pedido eliminado"}));
        let mut view = WaiterView::new(&api);
        view.refresh().await;
        assert!(!view.board().is_empty());

        api.http().respond("GET", "/pedidos/agrupados", json!({}));
        view.delete_order(OrderId(3)).await.unwrap();
        assert!(view.board().is_empty());

        let calls = api.http().calls();
        let methods: Vec<_> = calls.iter().map(|c| c.method).collect();
        assert_eq!(methods, ["GET", "DELETE", "GET"]);
    }

    #[tokio::test]
    async fn capture_requires_selection_then_refetches() {
        let api = api();
        api.http().respond(
            "GET",
            "/pedidos/por-mesa",
            json!({"ID_Pedido": 3, "ID_Estado": 1, "detalles": []}),
        );
        api.http().respond("POST", "/clientes/capturar", json!({"ok": true}));
        let mut view = WaiterView::new(&api);
        view.refresh().await;

        let err = view.capture_customer(DocumentType::Dni, "45678912").await;
        assert!(err.is_err());

        view.board_mut().select_table("Terraza", "5".into()).unwrap();
        let order = view
            .capture_customer(DocumentType::Dni, "45678912")
            .await
            .unwrap();
        assert_eq!(order, OrderId(3));

        let http = api.http();
        let lookup = http.calls_to("GET", "/pedidos/por-mesa");
        assert_eq!(lookup[0].body, json!({"numero": "5", "salon": "Terraza"}));
        let capture = http.calls_to("POST", "/clientes/capturar");
        assert_eq!(capture[0].body["documento"], "45678912");
        // Initial load plus the refetch after the write
        assert_eq!(http.calls_to("GET", "/pedidos/agrupados").len(), 2);
    }

    #[tokio::test]
    async fn pre_bill_merges_lines_and_carries_customer() {
        let api = api();
        let mut view = WaiterView::new(&api);
        view.refresh().await;
        view.board_mut().select_table("Terraza", "5".into()).unwrap();

        let bill = view.pre_bill().unwrap();
        assert_eq!(bill.table, "5");
        assert_eq!(bill.room, "Terraza");
        let lomo = bill.lines.iter().find(|l| l.product_id == ProductId(7)).unwrap();
        assert_eq!(lomo.quantity, 2);
        assert_eq!(bill.customer.unwrap().name, "ANA TORRES");
    }
}
