//! Resource shapes exchanged with the backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ValidationError;
use crate::money::{deserialize_optional_price, deserialize_price};

/// Catalog / inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub item_name: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_type_id: Option<i64>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
    #[serde(default)]
    pub reorder_level: Option<u32>,
    #[serde(default)]
    pub availability_status: Option<String>,
}

impl Item {
    /// Whether stock has fallen to the reorder level.
    pub fn needs_reorder(&self) -> bool {
        match (self.stock_quantity, self.reorder_level) {
            (Some(stock), Some(level)) => stock <= level,
            _ => false,
        }
    }
}

/// Inventory form contents, as typed by staff.
///
/// Creation identifies the item type by name; updates identify it by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub item_name: String,
    pub price: String,
    pub description: String,
    pub item_type_id: Option<i64>,
    pub type_name: String,
    pub stock_quantity: Option<u32>,
    pub reorder_level: Option<u32>,
    pub availability_status: String,
}

impl ItemDraft {
    /// Prefill the form from an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            item_name: item.item_name.clone(),
            price: item.price.to_string(),
            description: item.description.clone().unwrap_or_default(),
            item_type_id: item.item_type_id,
            type_name: item.type_name.clone().unwrap_or_default(),
            stock_quantity: item.stock_quantity,
            reorder_level: item.reorder_level,
            availability_status: item.availability_status.clone().unwrap_or_default(),
        }
    }

    /// Name, price, quantity, type and availability are required.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.item_name.trim().is_empty() {
            missing.push("item_name");
        }
        if self.price.trim().is_empty() {
            missing.push("price");
        }
        if self.stock_quantity.is_none() {
            missing.push("stock_quantity");
        }
        if self.type_name.trim().is_empty() {
            missing.push("type_name");
        }
        if self.availability_status.trim().is_empty() {
            missing.push("availability_status");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    pub(crate) fn create_body(&self) -> Value {
        json!({
            "item_name": self.item_name,
            "price": self.price,
            "description": self.description,
            "type_name": self.type_name,
            "stock_quantity": self.stock_quantity,
            "reorder_level": self.reorder_level.unwrap_or(0),
            "availability_status": self.availability_status,
        })
    }

    pub(crate) fn update_body(&self) -> Value {
        json!({
            "item_name": self.item_name,
            "price": self.price,
            "description": self.description,
            "item_type_id": self.item_type_id,
            "stock_quantity": self.stock_quantity,
            "reorder_level": self.reorder_level.unwrap_or(0),
            "availability_status": self.availability_status,
        })
    }
}

/// Supplier / partner company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Purchase as listed on the management screen.
///
/// The backend joins customer and line data into this record; fields not
/// named here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_price")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Header of a new purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseHeader {
    pub customer_id: i64,
    pub purchase_date: NaiveDate,
    pub total_amount: f64,
    pub status: String,
    pub shipping_address: String,
}

/// One line of a new purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseLine {
    pub item_id: i64,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Body of `POST /purchases`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPurchase {
    pub purchase: PurchaseHeader,
    pub items: Vec<PurchaseLine>,
}

/// Shipment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Shipment as listed by the backend. Dates are kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(default)]
    pub id: Option<i64>,
    pub purchase_id: i64,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipped_date: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
}

/// Body of `POST /shipping`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShipment {
    pub purchase_id: i64,
    pub shipping_status: ShippingStatus,
    pub tracking_number: String,
    pub shipped_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> Item {
        serde_json::from_value(json!({
            "id": 1,
            "item_name": "Pen",
            "price": "2.50",
            "type_name": "stationery",
            "stock_quantity": 4,
            "reorder_level": 5,
            "availability_status": "in_stock"
        }))
        .unwrap()
    }

    #[test]
    fn item_accepts_string_price() {
        let item = pen();
        assert_eq!(item.price, 2.5);
        assert!(item.description.is_none());
        assert!(item.needs_reorder());
    }

    #[test]
    fn draft_requires_core_fields() {
        let err = ItemDraft::default().validate().unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                "item_name",
                "price",
                "stock_quantity",
                "type_name",
                "availability_status"
            ]
        );
    }

    #[test]
    fn draft_from_item_validates() {
        let draft = ItemDraft::from_item(&pen());
        assert!(draft.validate().is_ok());
        assert_eq!(draft.price, "2.5");
    }

    #[test]
    fn create_and_update_bodies_differ_in_type_field() {
        let mut draft = ItemDraft::from_item(&pen());
        draft.item_type_id = Some(3);
        draft.reorder_level = None;

        let create = draft.create_body();
        assert_eq!(create["type_name"], "stationery");
        assert!(create.get("item_type_id").is_none());
        assert_eq!(create["reorder_level"], 0);

        let update = draft.update_body();
        assert_eq!(update["item_type_id"], 3);
        assert!(update.get("type_name").is_none());
    }

    #[test]
    fn shipping_status_tolerates_unknown_values() {
        let shipment: Shipment = serde_json::from_value(json!({
            "id": 4,
            "purchase_id": 10,
            "shipping_status": "returned"
        }))
        .unwrap();
        assert_eq!(shipment.shipping_status, ShippingStatus::Unknown);

        let shipment: Shipment =
            serde_json::from_value(json!({"purchase_id": 10, "shipping_status": "shipped"}))
                .unwrap();
        assert_eq!(shipment.shipping_status, ShippingStatus::Shipped);
    }

    #[test]
    fn new_purchase_serializes_dates_as_iso() {
        let purchase = NewPurchase {
            purchase: PurchaseHeader {
                customer_id: 2,
                purchase_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                total_amount: 5.0,
                status: "pending".into(),
                shipping_address: "1 Main St, Springfield, IL, 62701".into(),
            },
            items: vec![PurchaseLine {
                item_id: 1,
                quantity: 2,
                unit_price: 2.5,
                subtotal: 5.0,
            }],
        };
        let value = serde_json::to_value(&purchase).unwrap();
        assert_eq!(value["purchase"]["purchase_date"], "2026-10-19");
        assert_eq!(value["items"][0]["subtotal"], 5.0);
    }

    #[test]
    fn company_omits_missing_id() {
        let company = Company {
            name: "Tech Corp".into(),
            email: "contact@techcorp.com".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&company).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["name"], "Tech Corp");
    }
}
