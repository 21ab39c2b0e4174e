use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product_id: String,
    pub quantity: i64,
}

/// Requested quantities keyed by product id, in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Last write wins: an existing entry keeps its position but takes the new quantity.
    pub fn set(&mut self, product_id: &str, quantity: i64) {
        match self.entries.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity = quantity,
            None => self.entries.push(CartEntry {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.quantity)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the cart and returns how many lines were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: String,
    pub title: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub success: bool,
    pub message: String,
    pub cleared_lines: usize,
}
