//! Display grouping for board rows

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::OrderLine;
use crate::types::{DetailId, ItemStatus, ProductId};

/// Identical products in the same status share one display row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub product_id: ProductId,
    pub status: ItemStatus,
}

impl GroupKey {
    pub fn new(product_id: ProductId, status: ItemStatus) -> Self {
        Self { product_id, status }
    }

    pub fn of(line: &OrderLine) -> Self {
        Self::new(line.product_id, line.status)
    }
}

/// One display row: a product in a given status with its summed quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub key: GroupKey,
    pub product_name: String,
    pub quantity: u32,
    /// Line items merged into this row
    pub detail_ids: Vec<DetailId>,
}

impl GroupedRow {
    pub fn is_served(&self) -> bool {
        self.key.status.is_served()
    }
}

/// Merge lines by [`GroupKey`].
///
/// Rows come out ordered by key and `detail_ids` sorted, so the result does
/// not depend on input order.
pub fn group_lines<'a>(lines: impl IntoIterator<Item = &'a OrderLine>) -> Vec<GroupedRow> {
    let mut groups: BTreeMap<GroupKey, GroupedRow> = BTreeMap::new();
    for line in lines {
        let key = GroupKey::of(line);
        let row = groups.entry(key).or_insert_with(|| GroupedRow {
            key,
            product_name: line.product_name().to_string(),
            quantity: 0,
            detail_ids: Vec::new(),
        });
        row.quantity += line.quantity;
        row.detail_ids.push(line.id);
    }
    groups
        .into_values()
        .map(|mut row| {
            row.detail_ids.sort();
            row
        })
        .collect()
}
