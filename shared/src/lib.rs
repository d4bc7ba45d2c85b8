//! Shared types for the Comanda POS client
//!
//! Wire models of the restaurant back-end, the push event contract, the
//! waiter cart and the live board reconciliation logic.

pub mod board;
pub mod cart;
pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod types;
pub mod validation;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use board::{FloorBoard, GroupKey, Reaction, Station, StationBoard};
pub use cart::{Cart, CartItem};
pub use error::{BoardError, CartError, ValidationError};
pub use message::{EventType, PushEvent};
pub use types::{DetailId, ItemStatus, OrderId, ProductId, TableNumber};
