//! Client → server payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{DocumentType, OrderLine};
use crate::types::ProductId;

/// `imprimir-precuenta`: ask the print service for a table's pre-bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreBillRequest {
    #[serde(rename = "mesa")]
    pub table: String,
    #[serde(rename = "salon")]
    pub room: String,
    #[serde(rename = "productos")]
    pub lines: Vec<PreBillLine>,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<PreBillCustomer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreBillLine {
    #[serde(rename = "ID_Producto")]
    pub product_id: ProductId,
    #[serde(rename = "Cantidad")]
    pub quantity: u32,
    #[serde(rename = "Comentario", default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreBillCustomer {
    #[serde(rename = "tipoDoc")]
    pub doc_type: DocumentType,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl PreBillRequest {
    /// Build a pre-bill from a table's line items.
    ///
    /// Lines are merged per product: quantities add up and the first
    /// non-empty comment wins.
    pub fn from_lines<'a>(
        table: impl Into<String>,
        room: impl Into<String>,
        lines: impl IntoIterator<Item = &'a OrderLine>,
        customer: Option<PreBillCustomer>,
    ) -> Self {
        let mut grouped: BTreeMap<ProductId, PreBillLine> = BTreeMap::new();
        for line in lines {
            let comment = line.comment.clone().unwrap_or_default();
            grouped
                .entry(line.product_id)
                .and_modify(|entry| {
                    entry.quantity += line.quantity;
                    if entry.comment.is_empty() && !comment.is_empty() {
                        entry.comment = comment.clone();
                    }
                })
                .or_insert_with(|| PreBillLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    comment: comment.clone(),
                });
        }
        Self {
            table: table.into(),
            room: room.into(),
            lines: grouped.into_values().collect(),
            customer,
        }
    }
}
