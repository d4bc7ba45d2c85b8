//! Preparation station boards (bar, grill)
//!
//! Every pending unit of a station's products becomes one ticket. Tickets are
//! served one at a time; once all units of a line item are served the line is
//! reported complete so the caller can persist the status change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::Reaction;
use crate::error::BoardError;
use crate::message::PushEvent;
use crate::models::{AREA_BAR, AREA_GRILL, Order, OrderLine};
use crate::types::{DetailId, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    Bar,
    Grill,
}

impl Station {
    /// Preparation area name as stored by the back-end
    pub fn area_name(self) -> &'static str {
        match self {
            Station::Bar => AREA_BAR,
            Station::Grill => AREA_GRILL,
        }
    }

    /// Snapshot endpoint
    pub fn path(self) -> &'static str {
        match self {
            Station::Bar => "/pedidos/barra",
            Station::Grill => "/pedidos/plancha",
        }
    }

    pub fn handles(self, line: &OrderLine) -> bool {
        line.product
            .as_ref()
            .and_then(|p| p.area_name())
            .is_some_and(|area| area == self.area_name())
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Station::Bar => f.write_str("bar"),
            Station::Grill => f.write_str("grill"),
        }
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" | "barra" => Ok(Station::Bar),
            "grill" | "plancha" => Ok(Station::Grill),
            other => Err(format!("unknown station: {other}")),
        }
    }
}

/// One unit of a line item waiting at the station
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationTicket {
    pub detail_id: DetailId,
    pub order_id: OrderId,
    pub product_name: String,
    pub table: Option<String>,
    pub room: Option<String>,
    pub placed_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    /// Zero-based unit index within the line item
    pub unit: u32,
}

/// Comment for one unit: the `;`-separated segment at `unit`, falling back to
/// the whole comment.
pub fn unit_comment(comment: Option<&str>, unit: u32) -> Option<String> {
    let comment = comment?;
    let segment = comment
        .split(';')
        .nth(unit as usize)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match segment {
        Some(s) => Some(s.to_string()),
        None if !comment.trim().is_empty() => Some(comment.to_string()),
        None => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// More units of the line are still pending
    Partial {
        detail_id: DetailId,
        served: u32,
        total: u32,
    },
    /// Every unit is served; the line's status must be persisted
    LineComplete { detail_id: DetailId },
}

#[derive(Debug, Clone)]
pub struct StationBoard {
    station: Station,
    tickets: Vec<StationTicket>,
    totals: HashMap<DetailId, u32>,
    served: HashMap<DetailId, u32>,
}

impl StationBoard {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            tickets: Vec::new(),
            totals: HashMap::new(),
            served: HashMap::new(),
        }
    }

    pub fn station(&self) -> Station {
        self.station
    }

    pub fn tickets(&self) -> &[StationTicket] {
        &self.tickets
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Rebuild tickets from a station snapshot. Served counters start over.
    pub fn replace(&mut self, orders: Vec<Order>) {
        self.tickets.clear();
        self.totals.clear();
        self.served.clear();

        for order in orders.iter().filter(|o| o.status.is_pending()) {
            let table = order.table_label();
            let room = order.room_label();
            for line in order.lines.iter().filter(|l| self.station.handles(l)) {
                self.totals.insert(line.id, line.quantity);
                for unit in 0..line.quantity {
                    self.tickets.push(StationTicket {
                        detail_id: line.id,
                        order_id: order.id,
                        product_name: line.product_name().to_string(),
                        table: table.clone(),
                        room: room.clone(),
                        placed_at: order.placed_at,
                        comment: unit_comment(line.comment.as_deref(), unit),
                        unit,
                    });
                }
            }
        }
        // Unknown times go last; the sort is stable
        self.tickets
            .sort_by_key(|t| (t.placed_at.is_none(), t.placed_at));
    }

    /// Serve the ticket at `index` (position in [`tickets`](Self::tickets))
    pub fn serve(&mut self, index: usize) -> Result<ServeOutcome, BoardError> {
        if index >= self.tickets.len() {
            return Err(BoardError::NoSuchTicket(index));
        }
        let ticket = self.tickets.remove(index);
        let detail_id = ticket.detail_id;
        let total = self.totals.get(&detail_id).copied().unwrap_or(1);
        let served = self.served.entry(detail_id).or_insert(0);
        *served += 1;

        if *served >= total {
            let served = *served;
            self.drop_line(detail_id);
            tracing::debug!(station = %self.station, %detail_id, served, "Line fully served");
            Ok(ServeOutcome::LineComplete { detail_id })
        } else {
            Ok(ServeOutcome::Partial {
                detail_id,
                served: *served,
                total,
            })
        }
    }

    /// Remove every remaining ticket of a line and forget its counters
    pub fn drop_line(&mut self, detail_id: DetailId) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.detail_id != detail_id);
        self.totals.remove(&detail_id);
        self.served.remove(&detail_id);
        self.tickets.len() != before
    }

    pub fn apply_event(&mut self, event: &PushEvent) -> Reaction {
        match *event {
            PushEvent::NewOrder => Reaction::Refetch,
            PushEvent::ItemStatusChanged { detail_id, status } => {
                if status.is_pending() {
                    if self.totals.contains_key(&detail_id) {
                        Reaction::Unchanged
                    } else {
                        Reaction::Refetch
                    }
                } else {
                    Reaction::from_changed(self.drop_line(detail_id))
                }
            }
            PushEvent::ItemRemoved { detail_id } => {
                Reaction::from_changed(self.drop_line(detail_id))
            }
            PushEvent::ProductUpdated { .. } => Reaction::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaRef, ProductRef, RoomRef, TableRef};
    use crate::types::{ItemStatus, ProductId};
    use chrono::TimeZone;

    fn line(detail: i64, area: &str, quantity: u32, comment: Option<&str>) -> OrderLine {
        OrderLine {
            id: DetailId(detail),
            product_id: ProductId(detail * 10),
            quantity,
            comment: comment.map(str::to_string),
            status: ItemStatus::PENDING,
            product: Some(ProductRef {
                name: format!("Item {detail}"),
                area: Some(AreaRef { name: area.into() }),
            }),
        }
    }

    fn order(id: i64, minute: u32, status: ItemStatus, lines: Vec<OrderLine>) -> Order {
        Order {
            id: OrderId(id),
            placed_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 20, minute, 0).unwrap()),
            status,
            table_id: Some(id),
            table: Some(TableRef {
                number: id,
                room: Some(RoomRef {
                    name: "Terraza".into(),
                }),
            }),
            lines,
            customer: None,
        }
    }

    #[test]
    fn expands_units_and_filters_area() {
        let mut board = StationBoard::new(Station::Bar);
        board.replace(vec![
            order(2, 30, ItemStatus::PENDING, vec![line(5, "Barra", 1, None)]),
            order(
                1,
                10,
                ItemStatus::PENDING,
                vec![
                    line(1, "Barra", 3, Some("sin hielo; con limón")),
                    line(2, "Plancha", 2, None),
                ],
            ),
            order(3, 5, ItemStatus::SERVED, vec![line(9, "Barra", 1, None)]),
        ]);

        let tickets = board.tickets();
        assert_eq!(tickets.len(), 4);
        assert!(tickets[..3].iter().all(|t| t.detail_id == DetailId(1)));
        assert_eq!(tickets[3].detail_id, DetailId(5));
        assert_eq!(tickets[0].comment.as_deref(), Some("sin hielo"));
        assert_eq!(tickets[1].comment.as_deref(), Some("con limón"));
        assert_eq!(tickets[2].comment.as_deref(), Some("sin hielo; con limón"));
        assert_eq!(tickets[0].table.as_deref(), Some("1"));
        assert_eq!(tickets[0].room.as_deref(), Some("Terraza"));
    }

    #[test]
    fn line_completes_after_last_unit() {
        let mut board = StationBoard::new(Station::Grill);
        board.replace(vec![order(
            1,
            0,
            ItemStatus::PENDING,
            vec![line(4, "Plancha", 2, None), line(6, "Plancha", 1, None)],
        )]);

        assert_eq!(
            board.serve(0),
            Ok(ServeOutcome::Partial {
                detail_id: DetailId(4),
                served: 1,
                total: 2
            })
        );
        assert_eq!(
            board.serve(0),
            Ok(ServeOutcome::LineComplete {
                detail_id: DetailId(4)
            })
        );
        assert_eq!(board.tickets().len(), 1);
        assert_eq!(board.serve(3), Err(BoardError::NoSuchTicket(3)));
    }

    #[test]
    fn refetch_resets_served_counts() {
        let snapshot = || {
            vec![order(
                1,
                0,
                ItemStatus::PENDING,
                vec![line(4, "Plancha", 2, None)],
            )]
        };
        let mut board = StationBoard::new(Station::Grill);
        board.replace(snapshot());
        board.serve(0).unwrap();
        board.replace(snapshot());
        assert_eq!(board.tickets().len(), 2);
        assert!(matches!(board.serve(1), Ok(ServeOutcome::Partial { served: 1, .. })));
    }

    #[test]
    fn events() {
        let mut board = StationBoard::new(Station::Bar);
        board.replace(vec![order(
            1,
            0,
            ItemStatus::PENDING,
            vec![line(1, "Barra", 2, None), line(2, "Barra", 1, None)],
        )]);

        let served = PushEvent::ItemStatusChanged {
            detail_id: DetailId(1),
            status: ItemStatus::SERVED,
        };
        assert_eq!(board.apply_event(&served), Reaction::Changed);
        assert_eq!(board.tickets().len(), 1);

        let removed = PushEvent::ItemRemoved {
            detail_id: DetailId(42),
        };
        assert_eq!(board.apply_event(&removed), Reaction::Unchanged);
        assert_eq!(board.apply_event(&PushEvent::NewOrder), Reaction::Refetch);
    }

    #[test]
    fn pending_again_after_local_serve_refetches() {
        let mut board = StationBoard::new(Station::Bar);
        board.replace(vec![order(
            1,
            0,
            ItemStatus::PENDING,
            vec![line(1, "Barra", 1, None), line(2, "Barra", 2, None)],
        )]);
        assert_eq!(
            board.serve(0),
            Ok(ServeOutcome::LineComplete {
                detail_id: DetailId(1)
            })
        );

        let reopened = PushEvent::ItemStatusChanged {
            detail_id: DetailId(1),
            status: ItemStatus::PENDING,
        };
        assert_eq!(board.apply_event(&reopened), Reaction::Refetch);

        // A line that still has tickets needs nothing
        let still_open = PushEvent::ItemStatusChanged {
            detail_id: DetailId(2),
            status: ItemStatus::PENDING,
        };
        assert_eq!(board.apply_event(&still_open), Reaction::Unchanged);
    }

    #[test]
    fn unit_comment_fallbacks() {
        assert_eq!(unit_comment(None, 0), None);
        assert_eq!(unit_comment(Some("  "), 0), None);
        assert_eq!(unit_comment(Some("a;;c"), 1).as_deref(), Some("a;;c"));
        assert_eq!(unit_comment(Some("a;;c"), 2).as_deref(), Some("c"));
    }

    #[test]
    fn station_names() {
        assert_eq!("plancha".parse::<Station>(), Ok(Station::Grill));
        assert_eq!(Station::Bar.path(), "/pedidos/barra");
        assert_eq!(Station::Grill.area_name(), "Plancha");
    }
}
