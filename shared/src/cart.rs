//! Waiter cart
//!
//! Products picked from the menu with a quantity and up to one comment per
//! unit. Submitting expands every unit into its own order line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::models::{NewOrder, NewOrderLine, Product};
use crate::types::{ItemStatus, ProductId};

/// One product in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    /// Per-unit comments, never more than `quantity`
    #[serde(default)]
    pub comments: Vec<String>,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    fn get_mut(&mut self, product_id: ProductId) -> Result<&mut CartItem, CartError> {
        self.items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or(CartError::NotInCart(product_id))
    }

    /// Add one unit, returns the new quantity
    pub fn add_unit(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
            return item.quantity;
        }
        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
            comments: Vec::new(),
        });
        1
    }

    /// Remove one unit. The item disappears at zero and comments beyond the
    /// remaining quantity are dropped. Returns the new quantity.
    pub fn remove_unit(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let item = self.get_mut(product_id)?;
        item.quantity = item.quantity.saturating_sub(1);
        let quantity = item.quantity;
        if quantity == 0 {
            self.items.retain(|i| i.product.id != product_id);
        } else {
            item.comments.truncate(quantity as usize);
        }
        Ok(quantity)
    }

    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        if self.items.len() == before {
            return Err(CartError::NotInCart(product_id));
        }
        Ok(())
    }

    /// Open an empty comment slot, returns its index
    pub fn add_comment(&mut self, product_id: ProductId) -> Result<usize, CartError> {
        let item = self.get_mut(product_id)?;
        if item.comments.len() >= item.quantity as usize {
            return Err(CartError::TooManyComments {
                product_id,
                quantity: item.quantity,
            });
        }
        item.comments.push(String::new());
        Ok(item.comments.len() - 1)
    }

    pub fn set_comment(
        &mut self,
        product_id: ProductId,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), CartError> {
        let item = self.get_mut(product_id)?;
        let slot = item
            .comments
            .get_mut(index)
            .ok_or(CartError::NoSuchComment { product_id, index })?;
        *slot = text.into();
        Ok(())
    }

    pub fn delete_comment(&mut self, product_id: ProductId, index: usize) -> Result<(), CartError> {
        let item = self.get_mut(product_id)?;
        if index >= item.comments.len() {
            return Err(CartError::NoSuchComment { product_id, index });
        }
        item.comments.remove(index);
        Ok(())
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |i| i.quantity)
    }

    pub fn total_units(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Swap stored products for fresh catalog entries with the same id.
    ///
    /// Items whose product vanished from the catalog keep their stored copy.
    pub fn relink(&mut self, catalog: &[Product]) {
        for item in &mut self.items {
            if let Some(fresh) = catalog.iter().find(|p| p.id == item.product.id) {
                item.product = fresh.clone();
            }
        }
    }

    /// Build the `POST /pedidos` payload: one line per unit with its trimmed
    /// comment (or empty).
    pub fn to_order(&self, table_id: i64, now: DateTime<Utc>) -> Result<NewOrder, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }
        let lines = self
            .items
            .iter()
            .flat_map(|item| {
                (0..item.quantity as usize).map(move |unit| NewOrderLine {
                    quantity: 1,
                    comment: item
                        .comments
                        .get(unit)
                        .map(|c| c.trim().to_string())
                        .unwrap_or_default(),
                    status: ItemStatus::PENDING,
                    product_id: item.product.id,
                })
            })
            .collect();
        Ok(NewOrder {
            placed_at: now,
            status: ItemStatus::PENDING,
            table_id,
            lines,
        })
    }
}
