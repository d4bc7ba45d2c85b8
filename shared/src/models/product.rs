//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::area::AreaRef;
use crate::types::ProductId;

/// Product entity (`/productos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ID_Producto")]
    pub id: ProductId,
    #[serde(rename = "Nombre")]
    pub name: String,
    /// Unit price, the back-end sends either a number or a decimal string
    #[serde(rename = "Precio")]
    pub price: Decimal,
    #[serde(rename = "ID_Categoria")]
    pub category_id: i64,
    #[serde(rename = "ID_Area")]
    pub area_id: i64,
    /// Preparation area, present when the back-end joins it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaRef>,
}

/// Product as embedded in an order line (`detalle.producto`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaRef>,
}

impl ProductRef {
    /// Name of the preparation area, if known
    pub fn area_name(&self) -> Option<&str> {
        self.area.as_ref().map(|a| a.name.as_str())
    }
}

/// Create product payload (`/agregar-productos`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "idCategoria")]
    pub category_id: i64,
    #[serde(rename = "idArea")]
    pub area_id: i64,
}

/// Update product payload (`PUT /productos/:id`)
pub type ProductUpdate = ProductCreate;

/// Filter products by category and a case-insensitive name search
///
/// An empty search matches everything.
pub fn filter_products<'a>(
    products: &'a [Product],
    category_id: Option<i64>,
    search: &str,
) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    products
        .iter()
        .filter(|p| category_id.is_none_or(|c| p.category_id == c))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}
