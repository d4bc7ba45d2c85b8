//! User administration and order statistics

use serde::de::IgnoredAny;
use shared::models::{OrderStats, User, UserActivation};

use super::PosApi;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> PosApi<H> {
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.http.get("/usuarios").await
    }

    pub async fn set_user_active(&self, id: i64, active: bool) -> ClientResult<()> {
        let body = UserActivation { active };
        let _: IgnoredAny = self.http.patch(&format!("/usuarios/{id}"), &body).await?;
        tracing::info!(user_id = id, active, "User activation changed");
        Ok(())
    }

    pub async fn order_stats(&self) -> ClientResult<OrderStats> {
        self.http.get("/estadisticas/pedidos").await
    }
}
