//! Deterministic example products.
//!
//! When the provider supplies too few products for a banner, the storefront
//! backfills with synthesized three-tier placeholders so every category cell
//! still renders a full card row. Generation is a pure function of banner
//! identity and grid position.

use crate::catalog::banners::LocalBanner;
use crate::sellauth::types::{Product, Variant};
use std::collections::HashSet;

pub const SAMPLE_PRODUCT_ID_BASE: i64 = 920_000;

struct Tier {
    label: &'static str,
    multiplier: f64,
    stock: i64,
}

const TIERS: &[Tier] = &[
    Tier { label: "Lite", multiplier: 0.7, stock: 140 },
    Tier { label: "Prime", multiplier: 1.0, stock: 95 },
    Tier { label: "Elite", multiplier: 1.34, stock: 70 },
];

/// Two-decimal money rounding.
fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn description_for(name: &str, tier: &str) -> String {
    format!("{name} {tier} package with stable updates, strong visuals, and competitive tuning.")
}

/// The three placeholder tiers for one banner. `index` is the banner's grid
/// position and seeds both ids and pricing.
pub fn example_products_for_banner(banner: &LocalBanner, index: usize) -> Vec<Product> {
    let base = 14.0 + index as f64 * 2.6;

    TIERS
        .iter()
        .enumerate()
        .map(|(tier_index, tier)| {
            let product_id = SAMPLE_PRODUCT_ID_BASE + (index as i64) * 10 + tier_index as i64 + 1;
            let price = round_price(base * tier.multiplier);
            let variant_seed = product_id * 10;

            Product {
                id: product_id,
                name: format!("{} {}", banner.name, tier.label),
                description: description_for(&banner.name, tier.label),
                image: banner.image_url.clone(),
                price: Some(price),
                currency: "USD".to_string(),
                stock: Some(tier.stock - tier_index as i64 * 10),
                group_id: Some(banner.group_id),
                group_name: banner.name.clone(),
                category_id: Some(banner.category_id),
                category_name: banner.name.clone(),
                variants: vec![
                    Variant {
                        id: variant_seed + 1,
                        name: "24 Hours".to_string(),
                        price: Some(round_price(price * 0.38)),
                        stock: Some(220),
                    },
                    Variant {
                        id: variant_seed + 2,
                        name: "7 Days".to_string(),
                        price: Some(price),
                        stock: Some(140),
                    },
                    Variant {
                        id: variant_seed + 3,
                        name: "30 Days".to_string(),
                        price: Some(round_price(price * 2.4)),
                        stock: Some(80),
                    },
                ],
            }
        })
        .collect()
}

/// Top up every banner to at least `minimum_per_banner` products.
///
/// Counting keys off `category_id`, so this runs after banner assignment has
/// rewritten product identity. Synthesized ids that collide with ids already
/// in the snapshot are bumped by a large stride until free, keeping ids
/// unique without disturbing the deterministic base numbering.
pub fn ensure_example_products(
    products: Vec<Product>,
    banners: &[LocalBanner],
    minimum_per_banner: usize,
) -> Vec<Product> {
    if banners.is_empty() {
        return products;
    }

    let mut output = products;
    let mut used_ids: HashSet<i64> = output.iter().map(|product| product.id).collect();

    for (index, banner) in banners.iter().enumerate() {
        let mut count = output
            .iter()
            .filter(|product| product.category_id == Some(banner.category_id))
            .count();
        if count >= minimum_per_banner {
            continue;
        }

        for mut sample in example_products_for_banner(banner, index) {
            if count >= minimum_per_banner {
                break;
            }

            let mut next_id = sample.id;
            while used_ids.contains(&next_id) {
                next_id += 1_000_000;
            }
            sample.id = next_id;

            used_ids.insert(next_id);
            output.push(sample);
            count += 1;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::banners::{CATEGORY_ID_BASE, GROUP_ID_BASE};

    fn banner(position: i64, name: &str) -> LocalBanner {
        LocalBanner {
            name: name.to_string(),
            slug: name.to_lowercase(),
            image_url: format!("/pd/{}.png", name.to_lowercase()),
            group_id: GROUP_ID_BASE + position,
            category_id: CATEGORY_ID_BASE + position,
        }
    }

    #[test]
    fn tiers_are_deterministic_and_priced_off_grid_position() {
        let b = banner(1, "Rust");
        let products = example_products_for_banner(&b, 0);

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].id, SAMPLE_PRODUCT_ID_BASE + 1);
        assert_eq!(products[0].name, "Rust Lite");
        assert_eq!(products[0].price, Some(9.8)); // 14 * 0.7
        assert_eq!(products[0].stock, Some(140));
        assert_eq!(products[1].name, "Rust Prime");
        assert_eq!(products[1].price, Some(14.0));
        assert_eq!(products[1].stock, Some(85));
        assert_eq!(products[2].name, "Rust Elite");
        assert_eq!(products[2].price, Some(18.76)); // 14 * 1.34
        assert_eq!(products[2].stock, Some(50));

        // Second banner position shifts ids by 10 and base price by 2.6.
        let later = example_products_for_banner(&banner(2, "Apex"), 1);
        assert_eq!(later[0].id, SAMPLE_PRODUCT_ID_BASE + 11);
        assert_eq!(later[1].price, Some(16.6));
    }

    #[test]
    fn variants_follow_the_duration_ladder() {
        let products = example_products_for_banner(&banner(1, "Rust"), 0);
        let prime = &products[1];

        assert_eq!(prime.variants.len(), 3);
        assert_eq!(prime.variants[0].id, prime.id * 10 + 1);
        assert_eq!(prime.variants[0].name, "24 Hours");
        assert_eq!(prime.variants[0].price, Some(5.32)); // 14 * 0.38
        assert_eq!(prime.variants[0].stock, Some(220));
        assert_eq!(prime.variants[1].price, prime.price);
        assert_eq!(prime.variants[1].stock, Some(140));
        assert_eq!(prime.variants[2].price, Some(33.6)); // 14 * 2.4
        assert_eq!(prime.variants[2].stock, Some(80));
    }

    #[test]
    fn backfill_tops_up_only_sparse_banners() {
        let banners = vec![banner(1, "Rust"), banner(2, "Apex")];
        let mut provider = example_products_for_banner(&banners[0], 0);
        provider.truncate(2);
        // Rust has 2 real products, Apex none.
        let seeded: Vec<i64> = provider.iter().map(|p| p.id).collect();

        let output = ensure_example_products(provider, &banners, 3);

        let rust_count = output
            .iter()
            .filter(|p| p.category_id == Some(banners[0].category_id))
            .count();
        let apex_count = output
            .iter()
            .filter(|p| p.category_id == Some(banners[1].category_id))
            .count();
        assert_eq!(rust_count, 3);
        assert_eq!(apex_count, 3);

        // Existing products are untouched and still first.
        assert_eq!(output[0].id, seeded[0]);
        assert_eq!(output[1].id, seeded[1]);
    }

    #[test]
    fn colliding_sample_ids_are_bumped_not_duplicated() {
        let banners = vec![banner(1, "Rust")];
        // A provider product already sits on the first sample id.
        let mut squatter = example_products_for_banner(&banners[0], 0)[0].clone();
        squatter.category_id = Some(999); // different category, still counts for ids
        squatter.name = "Provider Product".to_string();

        let output = ensure_example_products(vec![squatter], &banners, 3);

        let mut seen = HashSet::new();
        for product in &output {
            assert!(seen.insert(product.id), "duplicate id {}", product.id);
        }
        assert!(output.iter().any(|p| p.id == SAMPLE_PRODUCT_ID_BASE + 1_000_001));
    }

    #[test]
    fn satisfied_banners_are_left_alone() {
        let banners = vec![banner(1, "Rust")];
        let provider = example_products_for_banner(&banners[0], 0);

        let output = ensure_example_products(provider.clone(), &banners, 3);
        assert_eq!(output, provider);
    }
}
