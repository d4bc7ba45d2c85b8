//! Customer lookup and capture onto a table's active order

use serde::Serialize;
use serde::de::IgnoredAny;
use shared::models::{CustomerCapture, CustomerLookup, DocumentType};
use shared::types::OrderId;
use shared::validation::validate_document;

use super::PosApi;
use crate::ClientResult;
use crate::http::HttpClient;

#[derive(Serialize)]
struct LookupQuery<'a> {
    #[serde(rename = "tipoDoc")]
    doc_type: DocumentType,
    #[serde(rename = "documento")]
    document: &'a str,
}

impl<H: HttpClient> PosApi<H> {
    /// Resolve a customer name from a DNI / RUC
    pub async fn lookup_customer(
        &self,
        doc_type: DocumentType,
        document: &str,
    ) -> ClientResult<CustomerLookup> {
        validate_document(doc_type, document)?;
        let query = LookupQuery {
            doc_type,
            document: document.trim(),
        };
        self.http.get_query("/clientes/buscar", &query).await
    }

    /// Attach a customer to an order
    pub async fn capture_customer(
        &self,
        doc_type: DocumentType,
        document: &str,
        order_id: OrderId,
    ) -> ClientResult<()> {
        validate_document(doc_type, document)?;
        let body = CustomerCapture {
            doc_type,
            document: document.trim().to_string(),
            order_id,
        };
        let _: IgnoredAny = self.http.post("/clientes/capturar", &body).await?;
        tracing::info!(%order_id, %doc_type, "Customer captured");
        Ok(())
    }
}
