use std::sync::Arc;
use crate::domain::{
    models::cart::{Cart, CartLine, CartView, CheckoutReceipt},
    ports::ProductRepository
};
use crate::error::AppError;
use tracing::{debug, info};

pub const CHECKOUT_MESSAGE: &str = "Order placed successfully!";

pub struct CartService {
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Replaces any earlier quantity for the product. The stock bound is only
    /// checked here, nothing holds the stock afterwards.
    pub async fn add_to_cart(&self, cart: &mut Cart, product_id: &str, quantity: i64) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidQuantity);
        }

        let product = self.products.find_by_id(product_id).await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        if quantity > product.quantity {
            return Err(AppError::Validation(format!(
                "Only {} of {} in stock", product.quantity, product.title
            )));
        }

        cart.set(&product.id, quantity);
        debug!("Cart now holds {} x {}", quantity, product.id);
        Ok(())
    }

    /// Prices come from the catalog at call time. Products deleted since they
    /// were added are skipped.
    pub async fn compute_view(&self, cart: &Cart) -> Result<CartView, AppError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut total = 0.0;

        for entry in cart.entries() {
            let Some(product) = self.products.find_by_id(&entry.product_id).await? else {
                debug!("Skipping vanished product {} in cart", entry.product_id);
                continue;
            };

            let subtotal = product.price * entry.quantity as f64;
            total += subtotal;
            lines.push(CartLine {
                product_id: product.id,
                title: product.title,
                quantity: entry.quantity,
                unit_price: product.price,
                subtotal,
            });
        }

        Ok(CartView { lines, total })
    }

    /// Confirmation only: no stock is decremented and no order is recorded.
    pub fn checkout(&self, cart: &mut Cart) -> CheckoutReceipt {
        let cleared_lines = cart.clear();
        info!("Checkout confirmed, cleared {} cart lines", cleared_lines);

        CheckoutReceipt {
            success: true,
            message: CHECKOUT_MESSAGE.to_string(),
            cleared_lines,
        }
    }
}
