//! Resource operations: items, purchases, shipments, companies

use api_client::{ApiClient, ApiRequest, Result};
use serde_json::Value;
use tracing::debug;

use crate::checkout::purchase_id;
use crate::error::ItemError;
use crate::models::{Company, Item, ItemDraft, NewPurchase, NewShipment, PurchaseSummary, Shipment};

/// Typed view of the storefront backend.
#[derive(Clone)]
pub struct Storefront {
    client: ApiClient,
}

impl Storefront {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // --- Items ---

    /// List catalog items. Nested arrays in the result are flattened one level;
    /// a result that is not an array reads as an empty catalog.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = match self.client.get("item").await?.result {
            Value::Array(rows) => rows,
            _ => Vec::new(),
        };
        let flat = flatten_once(rows);
        debug!(count = flat.len(), "fetched items");
        serde_json::from_value(Value::Array(flat))
            .map_err(|e| api_client::Error::Decode(format!("item list: {e}")))
    }

    /// Create an item. The draft is validated before any request is made.
    pub async fn create_item(&self, draft: &ItemDraft) -> std::result::Result<Value, ItemError> {
        draft.validate()?;
        Ok(self.client.post("item", &draft.create_body()).await?.result)
    }

    pub async fn update_item(
        &self,
        id: i64,
        draft: &ItemDraft,
    ) -> std::result::Result<Value, ItemError> {
        draft.validate()?;
        Ok(self
            .client
            .put(&format!("item/{id}"), &draft.update_body())
            .await?
            .result)
    }

    pub async fn delete_item(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("item/{id}")).await?;
        Ok(())
    }

    // --- Purchases ---

    pub async fn list_purchases(&self) -> Result<Vec<PurchaseSummary>> {
        self.client.get_result("purchases").await
    }

    /// Create a purchase and return its id when the backend reports one.
    pub async fn create_purchase(&self, purchase: &NewPurchase) -> Result<Option<i64>> {
        let envelope = self.client.post("purchases", purchase).await?;
        Ok(purchase_id(&envelope.result))
    }

    // --- Shipments ---

    pub async fn list_shipments(&self) -> Result<Vec<Shipment>> {
        let result: Value = self.client.get("shipping").await?.result;
        match result {
            Value::Null => Ok(Vec::new()),
            other => serde_json::from_value(other)
                .map_err(|e| api_client::Error::Decode(format!("shipment list: {e}"))),
        }
    }

    pub async fn create_shipment(&self, shipment: &NewShipment) -> Result<Value> {
        Ok(self.client.post("shipping", shipment).await?.result)
    }

    // --- Companies ---

    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        self.client.get_result("companies").await
    }

    pub async fn get_company(&self, id: i64) -> Result<Company> {
        self.client.get_result(&format!("companies/{id}")).await
    }

    pub async fn create_company(&self, company: &Company) -> Result<Company> {
        self.client
            .send_result(ApiRequest::post("companies").json(company)?)
            .await
    }

    pub async fn update_company(&self, id: i64, company: &Company) -> Result<Company> {
        self.client
            .send_result(ApiRequest::put(format!("companies/{id}")).json(company)?)
            .await
    }

    pub async fn delete_company(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("companies/{id}")).await?;
        Ok(())
    }

    /// Companies whose name contains `name`.
    pub async fn search_companies(&self, name: &str) -> Result<Vec<Company>> {
        self.client
            .send_result(ApiRequest::get("companies/search").query("name", name))
            .await
    }
}

fn flatten_once(rows: Vec<Value>) -> Vec<Value> {
    rows.into_iter()
        .flat_map(|row| match row {
            Value::Array(inner) => inner,
            other => vec![other],
        })
        .collect()
}
