//! Simulated checkout
//!
//! Totals the cart and issues a confirmation. No payment is taken and the
//! order is not sent anywhere.

use serde::Serialize;
use shared::models::CartItem;
use shared::{AppError, AppResult, ErrorCode};

use crate::cart::CartStore;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryOptions {
    pub flat_fee: f64,
    /// Subtotals at or above this ship free
    pub free_threshold: f64,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            flat_fee: 500.0,
            free_threshold: 50_000.0,
        }
    }
}

impl DeliveryOptions {
    pub fn fee_for(&self, subtotal: f64) -> f64 {
        if subtotal <= 0.0 || subtotal >= self.free_threshold {
            0.0
        } else {
            self.flat_fee
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn from_cart(items: &[CartItem], delivery: &DeliveryOptions) -> Self {
        let item_count = items.iter().map(|i| i.quantity).sum();
        let subtotal: f64 = items.iter().map(CartItem::line_total).sum();
        let delivery_fee = delivery.fee_for(subtotal);
        Self {
            item_count,
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// e.g. "NY-3F9A12BC"
    pub reference: String,
    pub customer_phone: String,
    pub summary: CheckoutSummary,
    pub placed_at: String,
}

/// Confirm the cart as an order and empty it
pub fn place_order(
    cart: &mut CartStore,
    session: &SessionStore,
    delivery: &DeliveryOptions,
) -> AppResult<OrderConfirmation> {
    let user = session.current_user().ok_or_else(AppError::not_authenticated)?;
    if cart.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty));
    }

    let summary = CheckoutSummary::from_cart(cart.items(), delivery);
    let confirmation = OrderConfirmation {
        reference: order_reference(),
        customer_phone: user.phone.clone(),
        summary,
        placed_at: shared::util::now_iso(),
    };

    cart.clear();
    tracing::info!(
        reference = %confirmation.reference,
        phone = %confirmation.customer_phone,
        total = confirmation.summary.total,
        "Order placed"
    );
    Ok(confirmation)
}

fn order_reference() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("NY-{}", id[..8].to_uppercase())
}
