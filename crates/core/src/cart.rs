//! Session-scoped cart store.
//!
//! A cart is an ordered list of line items, unique per
//! `(product_id, size, color)`. Every line holds a quantity of at least one;
//! any operation that would drop a quantity to zero removes the line instead.
//!
//! Subscribers registered with [`CartStore::subscribe`] are called after each
//! operation that changed the cart, with the event and the resulting lines.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

/// A single cart entry for one product/size/color combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    /// Unit price captured when the item was added.
    pub price: Decimal,
    pub name: String,
    pub image: String,
}

impl CartLineItem {
    /// The line's identity within a cart.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    fn is(&self, product_id: ProductId, size: &str, color: &str) -> bool {
        self.product_id == product_id && self.size == size && self.color == color
    }

    /// Unrounded `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A change applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A line was inserted or merged; `quantity` is the line's new quantity.
    ItemAdded { key: LineKey, quantity: u32 },
    /// A line's quantity was set.
    QuantityUpdated { key: LineKey, quantity: u32 },
    /// A line was deleted.
    ItemRemoved { key: LineKey },
    /// All lines were deleted.
    Cleared,
}

type Listener = Box<dyn Fn(&CartEvent, &[CartLineItem]) + Send + Sync>;

/// Mutable cart owned by one shopping session.
#[derive(Default)]
pub struct CartStore {
    lines: Vec<CartLineItem>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called after every change.
    ///
    /// Listeners live as long as the cart.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&CartEvent, &[CartLineItem]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Add an item, merging with an existing line of the same key.
    ///
    /// An item with zero quantity is ignored.
    pub fn add_item(&mut self, item: CartLineItem) {
        if item.quantity == 0 {
            return;
        }

        let (key, quantity) = if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.is(item.product_id, &item.size, &item.color))
        {
            line.quantity = line.quantity.saturating_add(item.quantity);
            (line.key(), line.quantity)
        } else {
            let entry = (item.key(), item.quantity);
            self.lines.push(item);
            entry
        };

        self.notify(&CartEvent::ItemAdded { key, quantity });
    }

    /// Delete the matching line. Returns false (and does nothing) if absent.
    pub fn remove_item(&mut self, product_id: ProductId, size: &str, color: &str) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|l| l.is(product_id, size, color))
        else {
            return false;
        };

        let line = self.lines.remove(index);
        self.notify(&CartEvent::ItemRemoved { key: line.key() });
        true
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Unknown keys are ignored.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        size: &str,
        color: &str,
        new_quantity: i64,
    ) {
        if new_quantity <= 0 {
            self.remove_item(product_id, size, color);
            return;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        let Some(line) = self.lines.iter_mut().find(|l| l.is(product_id, size, color)) else {
            return;
        };
        line.quantity = quantity;
        let key = line.key();

        self.notify(&CartEvent::QuantityUpdated { key, quantity });
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        self.notify(&CartEvent::Cleared);
    }

    /// Exact sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Cart total with currency, for display.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::new(self.total_price())
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn notify(&self, event: &CartEvent) {
        for listener in &self.listeners {
            listener(event, &self.lines);
        }
    }
}
