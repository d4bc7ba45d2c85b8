//! Push channel event contract
//!
//! One canonical contract for the live boards: every line-item event carries
//! the line-item identifier (`detalleId`), never a product identifier.
//!
//! | event                  | payload                             |
//! |------------------------|-------------------------------------|
//! | `nuevo-pedido`         | ignored                             |
//! | `producto-servido`     | `{ "detalleId": 1, "estado": 2 }`   |
//! | `producto-eliminado`   | `{ "detalleId": 1 }`                |
//! | `producto-actualizado` | `{ "productoId": 7 }` (optional)    |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::{DetailId, ItemStatus, ProductId};

pub mod payload;
pub use payload::*;

/// Wire names of the events
pub mod names {
    pub const NEW_ORDER: &str = "nuevo-pedido";
    pub const ITEM_SERVED: &str = "producto-servido";
    pub const ITEM_REMOVED: &str = "producto-eliminado";
    pub const PRODUCT_UPDATED: &str = "producto-actualizado";
    /// Client → server: print a pre-bill for a table
    pub const PRINT_PRE_BILL: &str = "imprimir-precuenta";
}

/// Server → client event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    NewOrder,
    ItemServed,
    ItemRemoved,
    ProductUpdated,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::NewOrder => names::NEW_ORDER,
            EventType::ItemServed => names::ITEM_SERVED,
            EventType::ItemRemoved => names::ITEM_REMOVED,
            EventType::ProductUpdated => names::PRODUCT_UPDATED,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = EventDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            names::NEW_ORDER => Ok(EventType::NewOrder),
            names::ITEM_SERVED => Ok(EventType::ItemServed),
            names::ITEM_REMOVED => Ok(EventType::ItemRemoved),
            names::PRODUCT_UPDATED => Ok(EventType::ProductUpdated),
            other => Err(EventDecodeError::UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Missing payload for {0}")]
    MissingPayload(EventType),

    #[error("Malformed payload for {event}: {source}")]
    Malformed {
        event: EventType,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed push event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Some order was created: boards refetch
    NewOrder,
    /// A line item moved to another status
    ItemStatusChanged { detail_id: DetailId, status: ItemStatus },
    /// A line item was deleted
    ItemRemoved { detail_id: DetailId },
    /// A catalog product changed (availability, price…)
    ProductUpdated { product_id: Option<ProductId> },
}

#[derive(Debug, Deserialize)]
struct ItemStatusPayload {
    #[serde(rename = "detalleId")]
    detail_id: DetailId,
    #[serde(rename = "estado")]
    status: ItemStatus,
}

#[derive(Debug, Deserialize)]
struct ItemRemovedPayload {
    #[serde(rename = "detalleId")]
    detail_id: DetailId,
}

#[derive(Debug, Default, Deserialize)]
struct ProductUpdatedPayload {
    #[serde(rename = "productoId", default)]
    product_id: Option<ProductId>,
}

impl PushEvent {
    /// Decode an event from its wire name and first argument
    pub fn decode(name: &str, payload: Option<&Value>) -> Result<Self, EventDecodeError> {
        let event_type: EventType = name.parse()?;
        match event_type {
            EventType::NewOrder => Ok(PushEvent::NewOrder),
            EventType::ItemServed => {
                let p: ItemStatusPayload = required(event_type, payload)?;
                Ok(PushEvent::ItemStatusChanged {
                    detail_id: p.detail_id,
                    status: p.status,
                })
            }
            EventType::ItemRemoved => {
                let p: ItemRemovedPayload = required(event_type, payload)?;
                Ok(PushEvent::ItemRemoved {
                    detail_id: p.detail_id,
                })
            }
            EventType::ProductUpdated => {
                let p = match payload {
                    Some(value) if !value.is_null() => {
                        ProductUpdatedPayload::deserialize(value).map_err(|source| {
                            EventDecodeError::Malformed {
                                event: event_type,
                                source,
                            }
                        })?
                    }
                    _ => ProductUpdatedPayload::default(),
                };
                Ok(PushEvent::ProductUpdated {
                    product_id: p.product_id,
                })
            }
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            PushEvent::NewOrder => EventType::NewOrder,
            PushEvent::ItemStatusChanged { .. } => EventType::ItemServed,
            PushEvent::ItemRemoved { .. } => EventType::ItemRemoved,
            PushEvent::ProductUpdated { .. } => EventType::ProductUpdated,
        }
    }
}

fn required<T: serde::de::DeserializeOwned>(
    event: EventType,
    payload: Option<&Value>,
) -> Result<T, EventDecodeError> {
    let value = payload.ok_or(EventDecodeError::MissingPayload(event))?;
    T::deserialize(value).map_err(|source| EventDecodeError::Malformed { event, source })
}
