//! Live order boards
//!
//! - [`floor`]: waiter board, room → table → line items
//! - [`station`]: bar and grill preparation boards
//! - [`key`]: display grouping shared by both

pub mod floor;
pub mod key;
pub mod station;

pub use floor::{FloorBoard, RefreshTicket, TableOrders, TableView};
pub use key::{GroupKey, GroupedRow, group_lines};
pub use station::{ServeOutcome, Station, StationBoard, StationTicket, unit_comment};

/// What a board needs after handling a push event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Local state can no longer be patched; fetch a fresh snapshot
    Refetch,
    /// Patched in place
    Changed,
    /// Nothing to do
    Unchanged,
}

impl Reaction {
    pub(crate) fn from_changed(changed: bool) -> Self {
        if changed {
            Reaction::Changed
        } else {
            Reaction::Unchanged
        }
    }
}
