//! Synthesized review feed.
//!
//! The storefront shows rotating customer reviews; the provider has no review
//! API, so reviews are generated deterministically from the current product
//! set (only the timestamps move with the clock).

use crate::sellauth::types::Product;
use chrono::{Duration, SecondsFormat, Utc};
use serde::Serialize;

pub const DEFAULT_REVIEW_LIMIT: usize = 16;

const REVIEW_MESSAGES: &[&str] = &[
    "Automatic feedback after 7 days.",
    "Solid update cadence and smooth setup.",
    "Undetected so far, performance is stable.",
    "Delivery was instant and key worked first try.",
    "Clean menu and easy configuration.",
    "Support replied quickly and solved my issue.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReview {
    pub id: String,
    pub rating: u8,
    pub date: String,
    pub message: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_image: String,
}

fn fallback_image_for(name: &str) -> &'static str {
    let normalized = name.to_lowercase();
    if normalized.contains("rust") {
        return "/pd/rust.png";
    }
    if normalized.contains("valorant") || normalized.contains("val") {
        return "/pd/valorant.png";
    }
    if normalized.contains("rainbow") || normalized.contains("r6") {
        return "/pd/rainbow-six-siege.png";
    }
    if normalized.contains("apex") {
        return "/pd/apex.png";
    }
    if normalized.contains("call of duty") || normalized.contains("cod") {
        return "/pd/call-of-duty.png";
    }
    "/games/fortnite.svg"
}

/// Generate `limit` reviews cycling over `products`. An empty product set
/// falls back to a single seed product so the feed is never empty.
pub fn reviews_from_products(products: &[Product], limit: usize) -> Vec<StoreReview> {
    let sources: Vec<(i64, &str, &str)> = if products.is_empty() {
        vec![(1, "Rust Prime", "/pd/rust.png")]
    } else {
        products
            .iter()
            .map(|product| (product.id, product.name.as_str(), product.image.as_str()))
            .collect()
    };

    let now = Utc::now();
    (0..limit)
        .map(|index| {
            let (product_id, product_name, product_image) = sources[index % sources.len()];
            let date = now - Duration::days((index / 4) as i64);
            let message = REVIEW_MESSAGES[index % REVIEW_MESSAGES.len()];
            let automatic = message == REVIEW_MESSAGES[0];
            let rating = if automatic {
                5
            } else if index % 7 == 0 {
                4
            } else {
                5
            };

            StoreReview {
                id: format!("review-{}-{}", product_id, index + 1),
                rating,
                date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
                message: message.to_string(),
                product_id,
                product_name: product_name.to_string(),
                product_image: if product_image.is_empty() {
                    fallback_image_for(product_name).to_string()
                } else {
                    product_image.to_string()
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, image: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            image: image.to_string(),
            price: None,
            currency: "USD".to_string(),
            stock: None,
            group_id: None,
            group_name: String::new(),
            category_id: None,
            category_name: String::new(),
            variants: Vec::new(),
        }
    }

    #[test]
    fn empty_catalog_still_yields_a_feed() {
        let reviews = reviews_from_products(&[], 16);

        assert_eq!(reviews.len(), 16);
        assert!(reviews.iter().all(|review| review.product_name == "Rust Prime"));
        assert_eq!(reviews[0].id, "review-1-1");
        assert_eq!(reviews[15].id, "review-1-16");
        assert_eq!(reviews[0].product_image, "/pd/rust.png");
    }

    #[test]
    fn reviews_cycle_products_and_messages() {
        let products = vec![
            product(10, "Rust Prime", "/pd/rust.png"),
            product(11, "Apex Elite", "/pd/apex.png"),
        ];
        let reviews = reviews_from_products(&products, 8);

        assert_eq!(reviews[0].product_id, 10);
        assert_eq!(reviews[1].product_id, 11);
        assert_eq!(reviews[2].product_id, 10);
        assert_eq!(reviews[6].message, REVIEW_MESSAGES[0]);
        assert_eq!(reviews[7].message, REVIEW_MESSAGES[1]);
    }

    #[test]
    fn automatic_feedback_is_always_five_stars() {
        let reviews = reviews_from_products(&[], 16);

        for (index, review) in reviews.iter().enumerate() {
            if review.message == REVIEW_MESSAGES[0] {
                assert_eq!(review.rating, 5);
            } else if index % 7 == 0 {
                assert_eq!(review.rating, 4);
            } else {
                assert_eq!(review.rating, 5);
            }
        }
        // Index 7 is the first non-automatic slot on the 7-step cadence.
        assert_eq!(reviews[7].rating, 4);
    }

    #[test]
    fn dates_step_back_one_day_per_four_reviews() {
        let reviews = reviews_from_products(&[], 9);
        let parse = |value: &str| {
            chrono::DateTime::parse_from_rfc3339(value).expect("rfc3339 date")
        };

        assert_eq!(parse(&reviews[0].date), parse(&reviews[3].date));
        let day_apart = parse(&reviews[0].date) - parse(&reviews[4].date);
        assert_eq!(day_apart, Duration::days(1));
        let two_apart = parse(&reviews[0].date) - parse(&reviews[8].date);
        assert_eq!(two_apart, Duration::days(2));
    }

    #[test]
    fn missing_image_falls_back_by_name() {
        let products = vec![product(5, "Call of Duty Unlock", "")];
        let reviews = reviews_from_products(&products, 1);
        assert_eq!(reviews[0].product_image, "/pd/call-of-duty.png");

        let products = vec![product(6, "Mystery Thing", "")];
        let reviews = reviews_from_products(&products, 1);
        assert_eq!(reviews[0].product_image, "/games/fortnite.svg");
    }
}
