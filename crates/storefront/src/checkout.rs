//! Checkout: purchase creation followed by a best-effort shipment record

use chrono::{Duration, NaiveDate, Utc};
use rand::RngExt;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cart::{Cart, ShippingAddress};
use crate::catalog::Storefront;
use crate::error::CheckoutError;
use crate::models::{NewPurchase, NewShipment, PurchaseHeader, ShippingStatus};
use crate::money::round2;

/// Delivery estimates, in days after shipping.
pub const DELIVERY_DAY_OPTIONS: [i64; 5] = [3, 5, 6, 7, 8];

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Absent when the backend did not report an id; no shipment is created then.
    pub purchase_id: Option<i64>,
    pub total: f64,
    pub shipment_created: bool,
}

/// Shipment record generated for a fresh purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentPlan {
    pub tracking_number: String,
    pub shipped_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

impl ShipmentPlan {
    /// Ship today, deliver after a random pick from [`DELIVERY_DAY_OPTIONS`].
    pub fn new(today: NaiveDate, now_millis: i64) -> Self {
        let mut rng = rand::rng();
        let days = DELIVERY_DAY_OPTIONS[rng.random_range(0..DELIVERY_DAY_OPTIONS.len())];
        let suffix: u32 = rng.random_range(0..1000);
        Self {
            tracking_number: format!("TRK{now_millis}{suffix}"),
            shipped_date: today,
            delivery_date: today + Duration::days(days),
        }
    }

    fn into_shipment(self, purchase_id: i64) -> NewShipment {
        NewShipment {
            purchase_id,
            shipping_status: ShippingStatus::Pending,
            tracking_number: self.tracking_number,
            shipped_date: self.shipped_date,
            delivery_date: self.delivery_date,
        }
    }
}

/// Build the purchase body for a cart. Status starts as `pending`.
pub fn build_purchase(
    cart: &Cart,
    address: &ShippingAddress,
    customer_id: i64,
    purchase_date: NaiveDate,
) -> NewPurchase {
    let items = cart.purchase_lines();
    let total_amount = round2(items.iter().map(|l| l.subtotal).sum());
    NewPurchase {
        purchase: PurchaseHeader {
            customer_id,
            purchase_date,
            total_amount,
            status: "pending".to_string(),
            shipping_address: address.format(),
        },
        items,
    }
}

/// Purchase id from a create response: `result.purchaseId`, else `result.id`.
pub(crate) fn purchase_id(result: &Value) -> Option<i64> {
    result
        .get("purchaseId")
        .or_else(|| result.get("id"))
        .and_then(|v| v.as_i64().or_else(|| v.as_str()?.parse().ok()))
}

impl Storefront {
    /// Place an order for the cart.
    ///
    /// The purchase must succeed. The follow-up shipment is best effort: its
    /// failure is logged and reported in the receipt, not returned as an error.
    pub async fn checkout(
        &self,
        cart: &Cart,
        address: &ShippingAddress,
        customer_id: i64,
    ) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !address.is_complete() {
            return Err(CheckoutError::IncompleteAddress);
        }

        let now = Utc::now();
        let today = now.date_naive();
        let purchase = build_purchase(cart, address, customer_id, today);
        let total = purchase.purchase.total_amount;

        let purchase_id = self.create_purchase(&purchase).await?;
        info!(?purchase_id, total, lines = purchase.items.len(), "purchase created");

        let mut shipment_created = false;
        if let Some(id) = purchase_id {
            let shipment = ShipmentPlan::new(today, now.timestamp_millis()).into_shipment(id);
            match self.create_shipment(&shipment).await {
                Ok(_) => {
                    info!(purchase_id = id, tracking = %shipment.tracking_number, "shipment created");
                    shipment_created = true;
                }
                Err(e) => {
                    warn!(purchase_id = id, error = %e, "purchase succeeded but shipment creation failed");
                }
            }
        }

        Ok(Receipt {
            purchase_id,
            total,
            shipment_created,
        })
    }
}
