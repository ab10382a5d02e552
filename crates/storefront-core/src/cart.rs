use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Product;

/// Storage key for the persisted cart
pub const CART_KEY: &str = "cart";

/// One line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub thumbnail: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            thumbnail: product.thumbnail.clone(),
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// What a cart mutation did, for the view to turn into a notification
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    Added { title: String },
    QuantityIncreased { title: String, quantity: u32 },
    QuantityUpdated { id: u64, quantity: u32 },
    Removed { id: u64 },
    Cleared,
    Unchanged,
}

impl std::fmt::Display for CartEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartEvent::Added { title } => write!(f, "Added to Cart! {} has been added to your cart", title),
            CartEvent::QuantityIncreased { title, quantity } => {
                write!(f, "Quantity Updated! {} quantity increased to {}", title, quantity)
            }
            CartEvent::QuantityUpdated { id, quantity } => {
                write!(f, "Quantity of item {} set to {}", id, quantity)
            }
            CartEvent::Removed { .. } => write!(f, "Removed from Cart"),
            CartEvent::Cleared => write!(f, "Cart Cleared"),
            CartEvent::Unchanged => write!(f, "Nothing changed"),
        }
    }
}

/// The shopping cart
///
/// Plain data: whoever owns it decides where it lives. The CLI keeps it in
/// the key/value store between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit, new line if the product isn't in the cart yet
    pub fn add(&mut self, item: CartItem) -> CartEvent {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            debug!("Cart: {} quantity now {}", existing.id, existing.quantity);
            return CartEvent::QuantityIncreased {
                title: existing.title.clone(),
                quantity: existing.quantity,
            };
        }

        let title = item.title.clone();
        self.items.push(CartItem { quantity: 1, ..item });
        CartEvent::Added { title }
    }

    pub fn remove(&mut self, id: u64) -> CartEvent {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            CartEvent::Unchanged
        } else {
            CartEvent::Removed { id }
        }
    }

    /// Set a line's quantity; zero removes the line
    pub fn update_quantity(&mut self, id: u64, quantity: u32) -> CartEvent {
        if quantity == 0 {
            return self.remove(id);
        }

        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                CartEvent::QuantityUpdated { id, quantity }
            }
            None => CartEvent::Unchanged,
        }
    }

    pub fn clear(&mut self) -> CartEvent {
        self.items.clear();
        CartEvent::Cleared
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units, not lines
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, i| count.saturating_add(i.quantity))
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}
