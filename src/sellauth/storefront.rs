//! Storefront snapshot assembly.
//!
//! One service owns the whole read path: fetch the four provider collections
//! concurrently, normalize whatever arrived, reconcile products into the
//! local banner categories, backfill sparse categories with example tiers,
//! and return a self-contained snapshot. Only a products failure degrades the
//! whole snapshot to the demo catalog; every lesser problem becomes a warning
//! on an otherwise live response.

use crate::catalog::assign::assign_products_to_banners;
use crate::catalog::banners::{
    banners_to_categories, banners_to_groups, load_local_banners, DEFAULT_BANNER_LIMIT,
};
use crate::catalog::mock::mock_storefront_data;
use crate::catalog::samples::ensure_example_products;
use crate::sellauth::checkout::{
    build_checkout_payload, extract_checkout_url, CheckoutInput, CheckoutOutcome,
};
use crate::sellauth::client::SellAuthClient;
use crate::sellauth::config::SellAuthConfig;
use crate::sellauth::normalize::{
    fallback_game_image, parse_category, parse_group, parse_payment_method, parse_product,
    unwrap_collection,
};
use crate::sellauth::types::{
    Category, Group, ImageRef, PaymentMethod, Product, StorefrontData, StorefrontProvider,
};
use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MIN_PRODUCTS_PER_BANNER: usize = 3;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "SellAuth is not configured. Set SELLAUTH_SHOP_ID and SELLAUTH_API_KEY.";

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The storefront's single entry point to provider data.
pub struct StorefrontService {
    config: SellAuthConfig,
    client: SellAuthClient,
    asset_root: PathBuf,
}

impl StorefrontService {
    pub fn new(config: SellAuthConfig, asset_root: impl Into<PathBuf>) -> Result<Self> {
        let client = SellAuthClient::new(config.clone())?;
        Ok(Self {
            config,
            client,
            asset_root: asset_root.into(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Assemble a complete snapshot. Infallible: an unconfigured or failing
    /// provider yields the demo catalog instead of an error.
    pub async fn storefront_data(&self) -> StorefrontData {
        if !self.config.is_configured() {
            return mock_storefront_data(&self.asset_root);
        }

        match self.live_storefront_data().await {
            Ok(data) => data,
            Err(error) => {
                warn!(error = %error, "storefront: provider failed, serving demo catalog");
                let mut data = mock_storefront_data(&self.asset_root);
                data.message = format!("SellAuth failed: {error}");
                data.warnings = vec![
                    "SellAuth API failed, showing demo mode catalog.".to_string(),
                    error.to_string(),
                ];
                data
            }
        }
    }

    async fn live_storefront_data(&self) -> Result<StorefrontData> {
        let (products_result, groups_result, categories_result, methods_result) = tokio::join!(
            self.client.get("products"),
            self.client.get("groups"),
            self.client.get("categories"),
            self.client.get("payment-methods"),
        );

        // Products are the one collection the storefront cannot do without.
        let products_data = products_result?;

        let mut warnings: Vec<String> = Vec::new();

        let products: Vec<Product> =
            unwrap_collection(&products_data, &["products", "items", "data"])
                .iter()
                .filter_map(parse_product)
                .collect();
        if products.is_empty() {
            warnings.push("SellAuth returned zero products.".to_string());
        }

        let provider_groups: Vec<Group> = match &groups_result {
            Ok(data) => unwrap_collection(data, &["groups", "items", "data"])
                .iter()
                .filter_map(parse_group)
                .collect(),
            Err(_) => Vec::new(),
        };
        let provider_categories: Vec<Category> = match &categories_result {
            Ok(data) => unwrap_collection(data, &["categories", "items", "data"])
                .iter()
                .filter_map(parse_category)
                .collect(),
            Err(_) => Vec::new(),
        };
        let payment_methods: Vec<PaymentMethod> = match &methods_result {
            Ok(data) => unwrap_collection(
                data,
                &["payment_methods", "paymentMethods", "methods", "items", "data"],
            )
            .iter()
            .filter_map(parse_payment_method)
            .filter(|method| method.enabled)
            .collect(),
            Err(_) => Vec::new(),
        };

        let banners = load_local_banners(&self.asset_root, DEFAULT_BANNER_LIMIT);
        let local_groups = banners_to_groups(&banners);
        let local_categories = banners_to_categories(&banners);
        let has_banner_art = banners
            .iter()
            .any(|banner| {
                banner.image_url.starts_with("/pd.png/") || banner.image_url.starts_with("/pd/")
            });

        let assigned = assign_products_to_banners(products, &banners);
        let products = ensure_example_products(assigned, &banners, MIN_PRODUCTS_PER_BANNER);

        if groups_result.is_err() {
            warnings.push("Could not fetch groups from SellAuth.".to_string());
        }
        if categories_result.is_err() {
            warnings.push("Could not fetch categories from SellAuth.".to_string());
        }
        if methods_result.is_err() {
            warnings.push("Could not fetch payment methods from SellAuth.".to_string());
        } else if payment_methods.is_empty() {
            warnings.push(
                "SellAuth returned zero enabled payment methods. Configure at least one payment method in your SellAuth dashboard."
                    .to_string(),
            );
        }
        if banners.len() < DEFAULT_BANNER_LIMIT {
            warnings.push(
                "Fewer than 14 banner images found. Added fallback categories to keep 14 visible categories."
                    .to_string(),
            );
        }
        if !has_banner_art {
            warnings.push(
                "No banner files found in public/pd.png, public/pd, pd.png, or pd. Using fallback images."
                    .to_string(),
            );
        }
        if provider_groups.is_empty() && provider_categories.is_empty() {
            warnings.push(
                "SellAuth groups/categories are empty. Applied local pd.png categories for storefront navigation."
                    .to_string(),
            );
        }

        info!(
            products = products.len(),
            groups = provider_groups.len(),
            categories = provider_categories.len(),
            payment_methods = payment_methods.len(),
            warnings = warnings.len(),
            "storefront: live snapshot assembled"
        );

        let groups = if !local_groups.is_empty() {
            local_groups
        } else if !provider_groups.is_empty() {
            provider_groups
        } else {
            ensure_groups_from_products(&products)
        };
        let categories = if !local_categories.is_empty() {
            local_categories
        } else if !provider_categories.is_empty() {
            provider_categories
        } else {
            ensure_categories_from_products(&products)
        };

        Ok(StorefrontData {
            success: true,
            provider: StorefrontProvider::Sellauth,
            message: "Live data loaded from SellAuth dashboard.".to_string(),
            products,
            groups,
            categories,
            payment_methods,
            warnings,
            fetched_at: now_iso(),
        })
    }

    /// Forward a sanitized cart to the provider's checkout endpoint.
    pub async fn create_checkout(&self, input: &CheckoutInput) -> Result<CheckoutOutcome> {
        if !self.config.is_configured() {
            bail!("{NOT_CONFIGURED_MESSAGE}");
        }

        let payload = build_checkout_payload(input);
        let data = self.client.post("checkout", &payload).await?;

        Ok(CheckoutOutcome {
            redirect_url: extract_checkout_url(&data),
            raw: data,
        })
    }

    /// Raw status + body of the cheapest authenticated provider endpoint,
    /// for the health check.
    pub async fn probe_provider(&self) -> Result<(u16, Value)> {
        self.client.get_status("payment-methods").await
    }
}

/// Synthesize group records from the ids products reference, for the case
/// where both local banners and the provider's group list are missing.
/// Insertion order follows product order; a zero/absent group id is skipped.
fn ensure_groups_from_products(products: &[Product]) -> Vec<Group> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut groups = Vec::new();

    for product in products {
        let Some(group_id) = product.group_id else {
            continue;
        };
        if group_id == 0 || !seen.insert(group_id) {
            continue;
        }
        let name = if product.group_name.is_empty() {
            format!("Group {group_id}")
        } else {
            product.group_name.clone()
        };
        let image_label = if product.group_name.is_empty() {
            product.name.as_str()
        } else {
            product.group_name.as_str()
        };
        groups.push(Group {
            id: group_id,
            name,
            description: String::new(),
            image: Some(ImageRef::new(fallback_game_image(image_label))),
        });
    }

    groups
}

fn ensure_categories_from_products(products: &[Product]) -> Vec<Category> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut categories = Vec::new();

    for product in products {
        let Some(category_id) = product.category_id else {
            continue;
        };
        if category_id == 0 || !seen.insert(category_id) {
            continue;
        }
        categories.push(Category {
            id: category_id,
            name: if product.category_name.is_empty() {
                format!("Category {category_id}")
            } else {
                product.category_name.clone()
            },
            description: String::new(),
            image: None,
        });
    }

    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn product(id: i64, group_id: Option<i64>, group_name: &str) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            image: String::new(),
            price: None,
            currency: "USD".to_string(),
            stock: None,
            group_id,
            group_name: group_name.to_string(),
            category_id: group_id,
            category_name: group_name.to_string(),
            variants: Vec::new(),
        }
    }

    #[test]
    fn groups_synthesized_from_products_skip_zero_and_duplicates() {
        let products = vec![
            product(1, Some(5), "Rust"),
            product(2, Some(5), "Rust"),
            product(3, Some(0), "Ghost"),
            product(4, None, ""),
            product(5, Some(9), ""),
        ];

        let groups = ensure_groups_from_products(&products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, 5);
        assert_eq!(groups[0].name, "Rust");
        assert_eq!(groups[0].image, Some(ImageRef::new("/games/rust.svg")));
        assert_eq!(groups[1].id, 9);
        assert_eq!(groups[1].name, "Group 9");

        let categories = ensure_categories_from_products(&products);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "Category 9");
        assert_eq!(categories[1].image, None);
    }

    #[tokio::test]
    async fn unconfigured_service_serves_demo_catalog() {
        let root = tempdir().unwrap();
        let service =
            StorefrontService::new(SellAuthConfig::unconfigured(), root.path()).unwrap();

        let data = service.storefront_data().await;
        assert!(data.success);
        assert_eq!(data.provider, StorefrontProvider::Mock);
        assert_eq!(data.products.len(), data.groups.len() * 3);
    }

    #[tokio::test]
    async fn unconfigured_checkout_is_rejected() {
        let root = tempdir().unwrap();
        let service =
            StorefrontService::new(SellAuthConfig::unconfigured(), root.path()).unwrap();

        let input = CheckoutInput {
            payment_method: "crypto".to_string(),
            email: None,
            coupon_code: None,
            items: Vec::new(),
        };
        let error = service.create_checkout(&input).await.unwrap_err();
        assert_eq!(error.to_string(), NOT_CONFIGURED_MESSAGE);
    }
}
