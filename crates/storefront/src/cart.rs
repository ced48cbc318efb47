//! Shopping cart and shipping address

use crate::models::{Item, PurchaseLine};
use crate::money::round2;

/// One cart entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: i64,
    pub quantity: u32,
    pub unit_price: f64,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        round2(self.unit_price * f64::from(self.quantity))
    }
}

/// Customer cart. Lines are unique per item and never exceed stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `item`, merging with an existing line.
    ///
    /// The line quantity is capped at the item's stock when stock is known.
    /// Returns the resulting quantity for the item (0 when nothing could be
    /// added).
    pub fn add(&mut self, item: &Item, quantity: u32) -> u32 {
        let cap = item.stock_quantity.unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity).min(cap);
            return line.quantity;
        }
        let quantity = quantity.min(cap);
        if quantity == 0 {
            return 0;
        }
        self.lines.push(CartLine {
            item_id: item.id,
            quantity,
            unit_price: item.price,
        });
        quantity
    }

    /// Drop an item from the cart. Returns whether it was present.
    pub fn remove(&mut self, item_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of rounded line subtotals, itself rounded to cents.
    pub fn total(&self) -> f64 {
        round2(self.lines.iter().map(CartLine::subtotal).sum())
    }

    pub(crate) fn purchase_lines(&self) -> Vec<PurchaseLine> {
        self.lines
            .iter()
            .map(|l| PurchaseLine {
                item_id: l.item_id,
                quantity: l.quantity,
                unit_price: round2(l.unit_price),
                subtotal: l.subtotal(),
            })
            .collect()
    }
}

/// Delivery address entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Street, city, state and zip are required; country is optional.
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip_code]
            .iter()
            .all(|part| !part.trim().is_empty())
    }

    /// Single-line form: non-blank parts joined by `", "`.
    pub fn format(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
