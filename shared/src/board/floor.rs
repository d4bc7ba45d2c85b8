//! Waiter board: room → table → line items
//!
//! The tree is replaced wholesale by a grouped snapshot and patched in place
//! by line-item events. View state (filters, selected table) lives next to the
//! tree and survives every refresh.

use std::collections::BTreeMap;

use super::Reaction;
use super::key::{GroupKey, GroupedRow, group_lines};
use crate::error::BoardError;
use crate::message::PushEvent;
use crate::models::{Customer, GroupedOrders, Order, OrderLine};
use crate::types::{DetailId, ItemStatus, OrderId, ProductId, TableNumber};

/// Handed out by [`FloorBoard::begin_refresh`], newer tickets win
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

/// Active orders of one table, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct TableOrders {
    pub number: TableNumber,
    pub order_ids: Vec<OrderId>,
    pub lines: Vec<OrderLine>,
    pub customer: Option<Customer>,
}

impl TableOrders {
    fn from_orders(number: TableNumber, orders: Vec<Order>) -> Self {
        let mut order_ids = Vec::with_capacity(orders.len());
        let mut lines = Vec::new();
        let mut customer = None;
        for order in orders {
            order_ids.push(order.id);
            if customer.is_none() {
                customer = order.customer;
            }
            lines.extend(order.lines);
        }
        Self {
            number,
            order_ids,
            lines,
            customer,
        }
    }

    pub fn rows(&self) -> Vec<GroupedRow> {
        group_lines(&self.lines)
    }

    /// Units of a product in a given status
    pub fn quantity_of(&self, key: GroupKey) -> u32 {
        self.lines
            .iter()
            .filter(|l| GroupKey::of(l) == key)
            .map(|l| l.quantity)
            .sum()
    }

    /// Units of a product regardless of status
    pub fn total_quantity(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .sum()
    }
}

/// One table as rendered by the board
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    pub room: &'a str,
    pub table: &'a TableOrders,
    pub rows: Vec<GroupedRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorBoard {
    rooms: BTreeMap<String, BTreeMap<TableNumber, TableOrders>>,
    last_ticket: u64,
    applied: Option<RefreshTicket>,
    room_filter: Option<String>,
    table_filter: Option<TableNumber>,
    selected: Option<(String, TableNumber)>,
}

impl FloorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board built straight from a snapshot
    pub fn from_grouped(snapshot: GroupedOrders) -> Self {
        let mut board = Self::new();
        let ticket = board.begin_refresh();
        board.complete_refresh(ticket, snapshot);
        board
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.last_ticket += 1;
        RefreshTicket(self.last_ticket)
    }

    /// Replace the tree with `snapshot` unless a newer refresh already landed.
    ///
    /// Returns whether the snapshot was applied.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, snapshot: GroupedOrders) -> bool {
        if self.applied.is_some_and(|applied| ticket < applied) {
            tracing::debug!(?ticket, applied = ?self.applied, "Discarding stale snapshot");
            return false;
        }
        self.rooms = snapshot
            .into_iter()
            .map(|(room, tables)| {
                let tables = tables
                    .into_iter()
                    .map(|(number, orders)| {
                        let number = TableNumber::new(number);
                        (number.clone(), TableOrders::from_orders(number, orders))
                    })
                    .collect();
                (room, tables)
            })
            .collect();
        self.applied = Some(ticket);
        true
    }

    /// Patch one line item's status. Unknown ids are ignored.
    pub fn apply_status_change(&mut self, detail_id: DetailId, status: ItemStatus) -> bool {
        let line = self
            .rooms
            .values_mut()
            .flat_map(|tables| tables.values_mut())
            .flat_map(|table| table.lines.iter_mut())
            .find(|line| line.id == detail_id);
        match line {
            Some(line) => {
                line.status = status;
                true
            }
            None => false,
        }
    }

    /// Drop a line item from every table. Unknown ids are ignored.
    pub fn remove_detail(&mut self, detail_id: DetailId) -> bool {
        let mut removed = false;
        for table in self.rooms.values_mut().flat_map(|t| t.values_mut()) {
            let before = table.lines.len();
            table.lines.retain(|line| line.id != detail_id);
            removed |= table.lines.len() != before;
        }
        removed
    }

    pub fn apply_event(&mut self, event: &PushEvent) -> Reaction {
        match *event {
            PushEvent::NewOrder => Reaction::Refetch,
            PushEvent::ItemStatusChanged { detail_id, status } => {
                Reaction::from_changed(self.apply_status_change(detail_id, status))
            }
            PushEvent::ItemRemoved { detail_id } => {
                Reaction::from_changed(self.remove_detail(detail_id))
            }
            PushEvent::ProductUpdated { .. } => Reaction::Unchanged,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.rooms.values().all(BTreeMap::is_empty)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    pub fn tables_in(&self, room: &str) -> Vec<&TableNumber> {
        self.rooms
            .get(room)
            .map(|tables| tables.keys().collect())
            .unwrap_or_default()
    }

    pub fn table(&self, room: &str, number: &TableNumber) -> Option<&TableOrders> {
        self.rooms.get(room)?.get(number)
    }

    pub fn customer_of(&self, room: &str, number: &TableNumber) -> Option<&Customer> {
        self.table(room, number)?.customer.as_ref()
    }

    // ── View state ──────────────────────────────────────────────────

    pub fn room_filter(&self) -> Option<&str> {
        self.room_filter.as_deref()
    }

    pub fn table_filter(&self) -> Option<&TableNumber> {
        self.table_filter.as_ref()
    }

    /// Changing the room always clears the table filter
    pub fn set_room_filter(&mut self, room: Option<String>) {
        self.room_filter = room;
        self.table_filter = None;
    }

    pub fn set_table_filter(&mut self, table: Option<TableNumber>) -> Result<(), BoardError> {
        let Some(table) = table else {
            self.table_filter = None;
            return Ok(());
        };
        let room = self.room_filter.as_deref().ok_or(BoardError::NoRoomSelected)?;
        if self.table(room, &table).is_none() {
            return Err(BoardError::NoSuchTable {
                room: room.to_string(),
                table: table.to_string(),
            });
        }
        self.table_filter = Some(table);
        Ok(())
    }

    /// Tables offered by the table filter: only those of the selected room
    pub fn selectable_tables(&self) -> Vec<&TableNumber> {
        self.room_filter
            .as_deref()
            .map(|room| self.tables_in(room))
            .unwrap_or_default()
    }

    pub fn select_table(&mut self, room: &str, number: TableNumber) -> Result<(), BoardError> {
        if self.table(room, &number).is_none() {
            return Err(BoardError::NoSuchTable {
                room: room.to_string(),
                table: number.to_string(),
            });
        }
        self.selected = Some((room.to_string(), number));
        Ok(())
    }

    pub fn selected_table(&self) -> Option<(&str, &TableNumber)> {
        self.selected.as_ref().map(|(room, table)| (room.as_str(), table))
    }

    /// Filtered tables with their grouped rows, rooms and tables in order
    pub fn view(&self) -> Vec<TableView<'_>> {
        let room_filter = self.room_filter.as_deref();
        let table_filter = self.table_filter.as_ref();
        self.rooms
            .iter()
            .filter(|(room, _)| room_filter.is_none_or(|f| f == room.as_str()))
            .flat_map(|(room, tables)| {
                tables
                    .values()
                    .filter(move |t| table_filter.is_none_or(|f| *f == t.number))
                    .map(move |table| TableView {
                        room: room.as_str(),
                        table,
                        rows: table.rows(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRef, TableRef};
    use rand::seq::SliceRandom;

    fn line(detail: i64, product: i64, status: ItemStatus) -> OrderLine {
        OrderLine {
            id: DetailId(detail),
            product_id: ProductId(product),
            quantity: 1,
            comment: None,
            status,
            product: Some(ProductRef {
                name: format!("P{product}"),
                area: None,
            }),
        }
    }

    fn order(id: i64, lines: Vec<OrderLine>) -> Order {
        Order {
            id: OrderId(id),
            placed_at: None,
            status: ItemStatus::PENDING,
            table_id: None,
            table: None::<TableRef>,
            lines,
            customer: None,
        }
    }

    fn snapshot(entries: Vec<(&str, &str, Vec<Order>)>) -> GroupedOrders {
        let mut grouped = GroupedOrders::new();
        for (room, table, orders) in entries {
            grouped
                .entry(room.to_string())
                .or_default()
                .insert(table.to_string(), orders);
        }
        grouped
    }

    fn table_five() -> GroupedOrders {
        snapshot(vec![(
            "Salon",
            "5",
            vec![order(
                1,
                vec![
                    line(1, 7, ItemStatus::PENDING),
                    line(2, 7, ItemStatus::PENDING),
                    line(3, 7, ItemStatus::PENDING),
                ],
            )],
        )])
    }

    #[test]
    fn one_serve_splits_the_row() {
        let mut board = FloorBoard::from_grouped(table_five());
        assert!(board.apply_status_change(DetailId(2), ItemStatus::SERVED));

        let table = board.table("Salon", &"5".into()).unwrap();
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, GroupKey::new(ProductId(7), ItemStatus::PENDING));
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[1].key, GroupKey::new(ProductId(7), ItemStatus::SERVED));
        assert_eq!(rows[1].quantity, 1);
    }

    #[test]
    fn status_changes_preserve_total_quantity() {
        let mut board = FloorBoard::from_grouped(table_five());
        let mut rng = rand::thread_rng();
        let mut ids = vec![1, 2, 3, 2, 1, 3, 3];
        ids.shuffle(&mut rng);
        for (i, id) in ids.into_iter().enumerate() {
            let status = if i % 2 == 0 {
                ItemStatus::SERVED
            } else {
                ItemStatus::PENDING
            };
            board.apply_status_change(DetailId(id), status);
            let table = board.table("Salon", &"5".into()).unwrap();
            assert_eq!(table.total_quantity(ProductId(7)), 3);
        }
    }

    #[test]
    fn removing_unknown_detail_is_noop() {
        let mut board = FloorBoard::from_grouped(table_five());
        let before = board.clone();
        assert!(!board.remove_detail(DetailId(99)));
        assert_eq!(board, before);
        assert_eq!(
            board.apply_event(&PushEvent::ItemRemoved {
                detail_id: DetailId(99)
            }),
            Reaction::Unchanged
        );
    }

    #[test]
    fn remove_drops_only_that_line() {
        let mut board = FloorBoard::from_grouped(table_five());
        assert!(board.remove_detail(DetailId(3)));
        let table = board.table("Salon", &"5".into()).unwrap();
        assert_eq!(table.total_quantity(ProductId(7)), 2);
    }

    #[test]
    fn refetch_replaces_patched_state() {
        let mut board = FloorBoard::from_grouped(table_five());
        board.apply_status_change(DetailId(1), ItemStatus::SERVED);
        board.remove_detail(DetailId(2));

        let ticket = board.begin_refresh();
        board.apply_status_change(DetailId(3), ItemStatus::SERVED);
        assert!(board.complete_refresh(ticket, table_five()));

        assert_eq!(board, {
            let mut fresh = FloorBoard::from_grouped(table_five());
            fresh.last_ticket = board.last_ticket;
            fresh.applied = board.applied;
            fresh
        });
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut board = FloorBoard::new();
        let older = board.begin_refresh();
        let newer = board.begin_refresh();
        assert!(board.complete_refresh(newer, table_five()));
        assert!(!board.complete_refresh(older, GroupedOrders::new()));
        assert!(!board.is_empty());
    }

    #[test]
    fn grouping_ignores_line_order() {
        let mut lines = vec![
            line(1, 7, ItemStatus::PENDING),
            line(2, 3, ItemStatus::SERVED),
            line(3, 7, ItemStatus::SERVED),
            line(4, 7, ItemStatus::PENDING),
            line(5, 3, ItemStatus::SERVED),
            line(6, 1, ItemStatus::PENDING),
        ];
        let expected = FloorBoard::from_grouped(snapshot(vec![(
            "Salon",
            "1",
            vec![order(1, lines.clone())],
        )]))
        .view()[0]
            .rows
            .clone();

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            lines.shuffle(&mut rng);
            let board = FloorBoard::from_grouped(snapshot(vec![(
                "Salon",
                "1",
                vec![order(1, lines.clone())],
            )]));
            assert_eq!(board.view()[0].rows, expected);
        }
    }

    #[test]
    fn filters_survive_refetch() {
        let data = || {
            snapshot(vec![
                ("Salon", "5", vec![order(1, vec![line(1, 7, ItemStatus::PENDING)])]),
                ("Salon", "12", vec![order(2, vec![line(2, 7, ItemStatus::PENDING)])]),
                ("Terraza", "2", vec![order(3, vec![line(3, 1, ItemStatus::PENDING)])]),
            ])
        };
        let mut board = FloorBoard::from_grouped(data());
        assert_eq!(
            board.set_table_filter(Some("5".into())),
            Err(BoardError::NoRoomSelected)
        );

        board.set_room_filter(Some("Salon".into()));
        let tables: Vec<&str> = board.selectable_tables().iter().map(|t| t.as_str()).collect();
        assert_eq!(tables, vec!["5", "12"]);
        board.set_table_filter(Some("12".into())).unwrap();
        board.select_table("Salon", "12".into()).unwrap();

        let ticket = board.begin_refresh();
        board.complete_refresh(ticket, data());
        assert_eq!(board.room_filter(), Some("Salon"));
        assert_eq!(board.table_filter().map(TableNumber::as_str), Some("12"));
        assert_eq!(board.selected_table().map(|(r, _)| r), Some("Salon"));
        let view = board.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].table.number.as_str(), "12");

        board.set_room_filter(Some("Terraza".into()));
        assert!(board.table_filter().is_none());
    }

    #[test]
    fn new_order_event_requests_refetch() {
        let mut board = FloorBoard::new();
        assert_eq!(board.apply_event(&PushEvent::NewOrder), Reaction::Refetch);
    }
}
