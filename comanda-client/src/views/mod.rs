//! Screen controllers
//!
//! Each view owns its board state and talks to the back-end through a
//! borrowed [`PosApi`](crate::api::PosApi). Live views share one
//! notification loop, [`watch`].

pub mod menu;
pub mod station;
pub mod waiter;

pub use menu::MenuView;
pub use station::StationView;
pub use waiter::WaiterView;

use async_trait::async_trait;
use shared::board::Reaction;
use shared::message::PushEvent;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::push::{Notification, PushSubscription};

/// A view kept in sync by push notifications
#[async_trait]
pub trait LiveView: Send {
    /// Fetch a fresh snapshot. Failures are recorded, not returned.
    async fn refresh(&mut self) -> bool;

    /// Patch local state from one event
    fn apply_event(&mut self, event: &PushEvent) -> Reaction;

    /// React to one notification. Returns whether the state changed.
    async fn handle(&mut self, notification: &Notification) -> bool {
        match notification {
            // Events may have been missed while disconnected
            Notification::Connected => self.refresh().await,
            Notification::Disconnected { reason } => {
                tracing::info!(%reason, "Live updates paused");
                false
            }
            Notification::Event(event) => match self.apply_event(event) {
                Reaction::Refetch => self.refresh().await,
                Reaction::Changed => true,
                Reaction::Unchanged => false,
            },
        }
    }
}

/// Feed one subscription result to `view`.
///
/// Returns whether the state changed, or `None` once the push client is gone.
/// A lagged receiver missed events and refetches.
pub async fn apply_received<V: LiveView>(
    view: &mut V,
    received: Result<Notification, RecvError>,
) -> Option<bool> {
    match received {
        Ok(notification) => Some(view.handle(&notification).await),
        Err(RecvError::Lagged(missed)) => {
            tracing::warn!(missed, "Notifications lagged, refetching");
            Some(view.refresh().await)
        }
        Err(RecvError::Closed) => {
            tracing::info!("Push client closed");
            None
        }
    }
}

/// Load the view, then follow notifications until `shutdown` fires or the
/// push client goes away. `on_change` runs after the initial load and after
/// every change.
pub async fn watch<V, F>(
    view: &mut V,
    subscription: &mut PushSubscription,
    shutdown: &CancellationToken,
    mut on_change: F,
) where
    V: LiveView,
    F: FnMut(&V) + Send,
{
    view.refresh().await;
    on_change(view);

    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = subscription.recv() => received,
        };
        match apply_received(view, received).await {
            Some(true) => on_change(view),
            Some(false) => {}
            None => break,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned-response HTTP client

    use async_trait::async_trait;
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::http::HttpClient;
    use crate::{ClientError, ClientResult};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub method: &'static str,
        pub path: String,
        pub body: Value,
    }

    #[derive(Default)]
    pub struct MockHttp {
        responses: Mutex<HashMap<String, Value>>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockHttp {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `method path` with `value`; unregistered calls get 404
        pub fn respond(&self, method: &str, path: &str, value: Value) {
            self.responses
                .lock()
                .unwrap()
                .insert(format!("{method} {path}"), value);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, method: &str, path: &str) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| c.method == method && c.path == path)
                .collect()
        }

        fn answer<T: DeserializeOwned>(
            &self,
            method: &'static str,
            path: &str,
            body: Value,
        ) -> ClientResult<T> {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_string(),
                body,
            });
            let value = self
                .responses
                .lock()
                .unwrap()
                .get(&format!("{method} {path}"))
                .cloned()
                .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
            Ok(serde_json::from_value(value)?)
        }
    }

    #[async_trait]
    impl HttpClient for MockHttp {
        async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
            self.answer("GET", path, Value::Null)
        }

        async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
            &self,
            path: &str,
            query: &Q,
        ) -> ClientResult<T> {
            self.answer("GET", path, serde_json::to_value(query)?)
        }

        async fn post<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.answer("POST", path, serde_json::to_value(body)?)
        }

        async fn put<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.answer("PUT", path, serde_json::to_value(body)?)
        }

        async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.answer("PATCH", path, serde_json::to_value(body)?)
        }

        async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
            self.answer("DELETE", path, Value::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockHttp;
    use super::*;
    use crate::api::PosApi;
    use serde_json::json;

    fn table(number: i64) -> serde_json::Value {
        json!([{
            "ID_Pedido": number,
            "ID_Estado": 1,
            "detalles": [{"ID_Detalle": number * 10, "ID_Producto": 7, "Cantidad": 1, "ID_Estado": 1}]
        }])
    }

    #[tokio::test]
    async fn lagged_receiver_replaces_the_snapshot() {
        let http = MockHttp::new();
        http.respond("GET", "/pedidos/agrupados", json!({"Terraza": {"1": table(1)}}));
        let api = PosApi::new(http);
        let mut view = WaiterView::new(&api);
        assert!(view.refresh().await);
        assert_eq!(view.board().tables_in("Terraza").len(), 1);

        api.http().respond(
            "GET",
            "/pedidos/agrupados",
            json!({"Terraza": {"1": table(1), "2": table(2)}}),
        );
        assert_eq!(apply_received(&mut view, Err(RecvError::Lagged(3))).await, Some(true));
        assert_eq!(view.board().tables_in("Terraza").len(), 2);
        assert_eq!(api.http().calls_to("GET", "/pedidos/agrupados").len(), 2);
    }

    #[tokio::test]
    async fn closed_receiver_ends_the_loop() {
        let api = PosApi::new(MockHttp::new());
        let mut view = WaiterView::new(&api);
        assert_eq!(apply_received(&mut view, Err(RecvError::Closed)).await, None);
        assert!(api.http().calls().is_empty());
    }
}
