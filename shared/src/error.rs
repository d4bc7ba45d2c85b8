//! Error types for the shared crate

use thiserror::Error;

use crate::types::ProductId;

/// Client-side form validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must contain only digits")]
    NotNumeric { field: &'static str },

    #[error("{field} must have exactly {expected} digits (got {actual})")]
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Cart operation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("Cannot add more comments than units ({quantity}) for product {product_id}")]
    TooManyComments { product_id: ProductId, quantity: u32 },

    #[error("Comment slot {index} does not exist for product {product_id}")]
    NoSuchComment { product_id: ProductId, index: usize },

    #[error("Cart is empty")]
    Empty,
}

/// Board operation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("No ticket at position {0}")]
    NoSuchTicket(usize),

    #[error("Select a room before filtering by table")]
    NoRoomSelected,

    #[error("Table {table} not found in room {room}")]
    NoSuchTable { room: String, table: String },

    #[error("No table selected")]
    NoTableSelected,
}
