//! Wire shapes shared between the SellAuth normalizer, the catalog
//! reconciliation pipeline, and the HTTP layer. Field names serialize in
//! camelCase to match what the storefront front-end already consumes.

use serde::{Deserialize, Serialize};

/// Image reference as the shop API nests it (`{"url": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A purchasable duration/option attached to a product.
///
/// `price`/`stock` of `None` mean unknown, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: i64,
    pub name: String,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Normalized product record. `group_*`/`category_*` start out as whatever
/// the provider supplied and are rewritten by banner assignment; a product may
/// reference a group/category id with no corresponding record (tolerated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Option<f64>,
    pub currency: String,
    pub stock: Option<i64>,
    pub group_id: Option<i64>,
    pub group_name: String,
    pub category_id: Option<i64>,
    pub category_name: String,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<ImageRef>,
}

/// Payment method ids are strings because the provider mixes numeric ids and
/// gateway keys ("crypto", "paypal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

/// Which backend produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorefrontProvider {
    Sellauth,
    Mock,
}

/// One fully-assembled storefront view. Immutable once constructed and
/// rebuilt from scratch on every request; there is no cache behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontData {
    pub success: bool,
    pub provider: StorefrontProvider,
    pub message: String,
    pub products: Vec<Product>,
    pub groups: Vec<Group>,
    pub categories: Vec<Category>,
    pub payment_methods: Vec<PaymentMethod>,
    pub warnings: Vec<String>,
    pub fetched_at: String,
}
