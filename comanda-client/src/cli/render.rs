//! Plain-text rendering of boards, menu and cart

use std::fmt::Write;

use shared::board::{FloorBoard, StationBoard};
use shared::cart::Cart;
use shared::models::{Category, DiningTable, Order, Product, Room};

pub fn floor(board: &FloorBoard) -> String {
    let mut out = String::new();
    let tables = board.view();
    if tables.is_empty() {
        out.push_str("No active orders\n");
        return out;
    }
    for view in tables {
        let _ = write!(out, "── {} · Mesa {}", view.room, view.table.number);
        if let Some(customer) = board.customer_of(view.room, &view.table.number) {
            let _ = write!(out, " · {} {} {}", customer.doc_type, customer.document, customer.name);
        }
        out.push('\n');
        for row in &view.rows {
            let _ = writeln!(
                out,
                "  {:>3} x {:<30} {}",
                row.quantity,
                row.product_name,
                row.key.status
            );
        }
        let orders: Vec<String> = view.table.order_ids.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "  orders: {}", orders.join(", "));
    }
    out
}

pub fn station(board: &StationBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} board", board.station());
    if board.is_empty() {
        out.push_str("Nothing pending\n");
        return out;
    }
    for (index, ticket) in board.tickets().iter().enumerate() {
        let time = ticket
            .placed_at
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".into());
        let _ = write!(
            out,
            "[{index:>2}] {time} {:<24} mesa {} {}",
            ticket.product_name,
            ticket.table.as_deref().unwrap_or("?"),
            ticket.room.as_deref().unwrap_or("")
        );
        if let Some(comment) = &ticket.comment {
            let _ = write!(out, " « {comment} »");
        }
        out.push('\n');
    }
    out
}

pub fn menu(products: &[&Product], categories: &[Category]) -> String {
    let mut out = String::new();
    for product in products {
        let category = categories
            .iter()
            .find(|c| c.id == product.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{:>4}  {:<30} {:>8}  {}",
            product.id, product.name, product.price, category
        );
    }
    if products.is_empty() {
        out.push_str("No products match\n");
    }
    out
}

pub fn selection(room: Option<&Room>, table: Option<&DiningTable>) -> String {
    match (room, table) {
        (Some(room), Some(table)) => format!("Table {} in {}\n", table.number, room.name),
        (Some(room), None) => format!("{} has no tables\n", room.name),
        _ => "No rooms configured\n".into(),
    }
}

pub fn cart(cart: &Cart) -> String {
    let mut out = String::new();
    if cart.is_empty() {
        out.push_str("Cart is empty\n");
        return out;
    }
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:>4}  {:<30} x{:<3} {:>8}",
            item.product.id,
            item.product.name,
            item.quantity,
            item.subtotal()
        );
        for (index, comment) in item.comments.iter().enumerate() {
            let _ = writeln!(out, "        [{index}] {comment}");
        }
    }
    let _ = writeln!(out, "{} units, total {}", cart.total_units(), cart.total_price());
    out
}

pub fn order(order: &Order) -> String {
    let mut out = String::new();
    let _ = write!(out, "Order {}", order.id);
    if let Some(table) = order.table_label() {
        let _ = write!(out, " · mesa {table}");
    }
    if let Some(customer) = &order.customer {
        let _ = write!(out, " · {}", customer.name);
    }
    out.push('\n');
    for line in &order.lines {
        let _ = writeln!(
            out,
            "  #{:<6} {:>3} x {:<30} {}",
            line.id,
            line.quantity,
            line.product_name(),
            line.status
        );
    }
    out
}
