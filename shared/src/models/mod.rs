//! Data models
//!
//! Mirrors of the back-end JSON records. Field names follow the back-end
//! (`ID_Producto`, `Nombre`, …) on the wire and snake_case in Rust.

pub mod area;
pub mod category;
pub mod customer;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod room;
pub mod stats;
pub mod user;

// Re-exports
pub use area::*;
pub use category::*;
pub use customer::*;
pub use dining_table::*;
pub use order::*;
pub use product::*;
pub use room::*;
pub use stats::*;
pub use user::*;
