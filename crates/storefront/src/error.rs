//! Error types for storefront operations

/// A form failed local validation before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// Errors from item mutations: local validation or the API call.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] api_client::Error),
}

/// Errors from [`crate::Storefront::checkout`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("shipping address is incomplete")]
    IncompleteAddress,

    #[error(transparent)]
    Api(#[from] api_client::Error),
}
