//! Demo-mode catalog.
//!
//! When no provider credentials are configured (or the provider is down) the
//! API serves a fully synthesized storefront so the front-end keeps working
//! end to end: every banner gets its three example tiers and a plausible set
//! of payment methods.

use crate::catalog::banners::{
    banners_to_categories, banners_to_groups, load_local_banners, DEFAULT_BANNER_LIMIT,
};
use crate::catalog::samples::example_products_for_banner;
use crate::sellauth::types::{PaymentMethod, StorefrontData, StorefrontProvider};
use chrono::{SecondsFormat, Utc};
use std::path::Path;

pub const DEMO_MODE_MESSAGE: &str =
    "SellAuth is not configured yet. Showing demo catalog with full UI behavior.";

const SETUP_HINT: &str =
    "Add SELLAUTH_SHOP_ID and SELLAUTH_API_KEY in .env.local to switch from demo mode to live dashboard data.";

fn demo_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod { id: "crypto".to_string(), name: "Crypto".to_string(), enabled: true },
        PaymentMethod { id: "paypal".to_string(), name: "PayPal".to_string(), enabled: true },
        PaymentMethod { id: "card".to_string(), name: "Card".to_string(), enabled: true },
    ]
}

/// Build the complete demo snapshot from the local banner set under `root`.
pub fn mock_storefront_data(root: &Path) -> StorefrontData {
    let banners = load_local_banners(root, DEFAULT_BANNER_LIMIT);

    let products = banners
        .iter()
        .enumerate()
        .flat_map(|(index, banner)| example_products_for_banner(banner, index))
        .collect();

    StorefrontData {
        success: true,
        provider: StorefrontProvider::Mock,
        message: DEMO_MODE_MESSAGE.to_string(),
        products,
        groups: banners_to_groups(&banners),
        categories: banners_to_categories(&banners),
        payment_methods: demo_payment_methods(),
        warnings: vec![SETUP_HINT.to_string()],
        fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn demo_snapshot_is_complete() {
        let root = tempdir().unwrap();
        let data = mock_storefront_data(root.path());

        assert!(data.success);
        assert_eq!(data.provider, StorefrontProvider::Mock);
        assert_eq!(data.groups.len(), DEFAULT_BANNER_LIMIT);
        assert_eq!(data.categories.len(), DEFAULT_BANNER_LIMIT);
        assert_eq!(data.products.len(), DEFAULT_BANNER_LIMIT * 3);
        assert_eq!(data.payment_methods.len(), 3);
        assert!(data.payment_methods.iter().all(|method| method.enabled));
        assert_eq!(data.warnings.len(), 1);
        assert!(data.fetched_at.ends_with('Z'));
    }

    #[test]
    fn demo_products_sit_in_demo_categories() {
        let root = tempdir().unwrap();
        let data = mock_storefront_data(root.path());

        for category in &data.categories {
            let count = data
                .products
                .iter()
                .filter(|product| product.category_id == Some(category.id))
                .count();
            assert_eq!(count, 3, "category {} should have 3 tiers", category.name);
        }
    }
}
