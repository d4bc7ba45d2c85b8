//! Bar and grill board controller (`/barravisual`, `/planchavisual`)

use async_trait::async_trait;
use shared::board::{Reaction, ServeOutcome, Station, StationBoard};
use shared::message::PushEvent;
use shared::types::ItemStatus;

use super::LiveView;
use crate::ClientResult;
use crate::api::PosApi;
use crate::http::HttpClient;

pub struct StationView<'a, H: HttpClient> {
    api: &'a PosApi<H>,
    board: StationBoard,
    last_error: Option<String>,
}

impl<'a, H: HttpClient> StationView<'a, H> {
    pub fn new(api: &'a PosApi<H>, station: Station) -> Self {
        Self {
            api,
            board: StationBoard::new(station),
            last_error: None,
        }
    }

    pub fn board(&self) -> &StationBoard {
        &self.board
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Serve the ticket at `index`. The last unit of a line marks the line
    /// served on the back-end.
    pub async fn serve(&mut self, index: usize) -> ClientResult<ServeOutcome> {
        let outcome = self.board.serve(index)?;
        if let ServeOutcome::LineComplete { detail_id } = outcome {
            self.api.set_line_status(detail_id, ItemStatus::SERVED).await?;
            tracing::info!(station = %self.board.station(), %detail_id, "Line served");
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<'a, H: HttpClient> LiveView for StationView<'a, H> {
    async fn refresh(&mut self) -> bool {
        match self.api.station_orders(self.board.station()).await {
            Ok(orders) => {
                self.board.replace(orders);
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!(station = %self.board.station(), "Station fetch failed: {e}");
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
    use shared::types::DetailId;

    fn api() -> PosApi<MockHttp> {
        let http = MockHttp::new();
        http.respond(
            "GET",
            "/pedidos/barra",
            json!([{
                "ID_Pedido": 8,
                "Fecha_hora": "2024-05-01T20:00:00Z",
                "ID_Estado": 1,
                "mesa": {"Numero_mesa": 2, "salon": {"Nombre": "Salón principal"}},
                "detalles": [
                    {"ID_Detalle": 40, "ID_Producto": 11, "Cantidad": 2, "Comentario": "sin hielo;doble",
                     "ID_Estado": 1, "producto": {"Nombre": "Pisco sour", "area": {"Nombre": "Barra"}}},
                    {"ID_Detalle": 41, "ID_Producto": 12, "Cantidad": 1, "ID_Estado": 1,
                     "producto": {"Nombre": "Anticucho", "area": {"Nombre": "Plancha"}}}
                ]
            }]),
        );
        http.respond("PUT", "/detalles/40/estado", json!({"message": "ok"}));
        PosApi::new(http)
    }

    #[tokio::test]
    async fn serving_every_unit_persists_the_line() {
        let api = api();
        let mut view = StationView::new(&api, Station::Bar);
        assert!(view.refresh().await);
        assert_eq!(view.board().tickets().len(), 2);
        assert_eq!(view.board().tickets()[1].comment.as_deref(), Some("doble"));

        let first = view.serve(0).await.unwrap();
        assert!(matches!(first, ServeOutcome::Partial { served: 1, total: 2, .. }));
        assert!(api.http().calls_to("PUT", "/detalles/40/estado").is_empty());

        let second = view.serve(0).await.unwrap();
        assert_eq!(second, ServeOutcome::LineComplete { detail_id: DetailId(40) });
        let puts = api.http().calls_to("PUT", "/detalles/40/estado");
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].body, json!({"estado": 2}));
        assert!(view.board().is_empty());
    }

    #[tokio::test]
    async fn new_order_refetches_and_removal_drops_tickets() {
        let api = api();
        let mut view = StationView::new(&api, Station::Bar);
        view.refresh().await;

        assert!(
            view.handle(&Notification::Event(PushEvent::ItemRemoved {
                detail_id: DetailId(40)
            }))
            .await
        );
        assert!(view.board().is_empty());

        assert!(view.handle(&Notification::Event(PushEvent::NewOrder)).await);
        assert_eq!(view.board().tickets().len(), 2);
    }

    #[tokio::test]
    async fn failed_status_update_surfaces_error() {
        let api = api();
        let mut view = StationView::new(&api, Station::Grill);
        api.http().respond(
            "GET",
            "/pedidos/plancha",
            json!([{
                "ID_Pedido": 9,
                "ID_Estado": 1,
                "detalles": [{"ID_Detalle": 41, "ID_Producto": 12, "Cantidad": 1, "ID_Estado": 1,
                              "producto": {"Nombre": "Anticucho", "area": {"Nombre": "Plancha"}}}]
            }]),
        );
        view.refresh().await;
        // No canned answer for /detalles/41/estado
        assert!(view.serve(0).await.is_err());
        assert_eq!(api.http().calls_to("PUT", "/detalles/41/estado").len(), 1);
    }
}
