//! Storefront and back-office operations over the authenticated API client
//!
//! Customer side: catalog listing, [`Cart`] and [`Storefront::checkout`].
//! Staff side: inventory, purchase, shipment and company administration.
//! Every call goes through [`api_client::ApiClient`], so authentication and
//! refresh are handled there.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod models;
pub mod money;
pub mod user;

pub use cart::{Cart, CartLine, ShippingAddress};
pub use catalog::Storefront;
pub use checkout::{Receipt, ShipmentPlan};
pub use error::{CheckoutError, ItemError, ValidationError};
pub use models::{
    Company, Item, ItemDraft, NewPurchase, NewShipment, PurchaseHeader, PurchaseLine,
    PurchaseSummary, Shipment, ShippingStatus,
};
pub use user::UserState;
