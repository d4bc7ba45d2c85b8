//! Common types for the shared crate
//!
//! Identifier newtypes and the line-item status marker used by every model.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Product identifier (`ID_Producto`)
    ProductId
);
id_newtype!(
    /// Line item identifier (`ID_Detalle`)
    DetailId
);
id_newtype!(
    /// Order identifier (`ID_Pedido`)
    OrderId
);

/// Line item / order lifecycle marker (`ID_Estado`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStatus(pub i32);

impl ItemStatus {
    pub const PENDING: ItemStatus = ItemStatus(1);
    pub const SERVED: ItemStatus = ItemStatus(2);

    pub fn is_pending(self) -> bool {
        self == Self::PENDING
    }

    pub fn is_served(self) -> bool {
        self == Self::SERVED
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::PENDING
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PENDING => f.pad("pending"),
            Self::SERVED => f.pad("served"),
            ItemStatus(other) => f.pad(&format!("status-{other}")),
        }
    }
}

/// Table number as shown on the floor ("5", "12", "T3")
///
/// Ordered numerically when both sides are integers, lexicographically otherwise,
/// so that "2" sorts before "10".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableNumber(pub String);

impl TableNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for TableNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<i64>(), other.0.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TableNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TableNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TableNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for TableNumber {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}
