//! Product-to-banner assignment.
//!
//! Every normalized product is re-homed into one of the curated banner
//! categories through a chain of matchers, tried in priority order:
//!
//! 1. exact alias lookup on the product's own group/category labels,
//! 2. a sliding window over the product's text (single token, then the
//!    concatenation of two and three adjacent tokens, so "rainbow six siege"
//!    and "counter strike 2" match their compound aliases),
//! 3. a deterministic hash over `(|id| + name length)`.
//!
//! The hash tier means no product is ever left unassigned; products with no
//! recognizable text land in a stable, arbitrary banner rather than being
//! dropped.

use crate::catalog::alias::{alias_tokens_for_label, normalize_alias_token};
use crate::catalog::banners::LocalBanner;
use crate::catalog::slug::to_game_slug;
use crate::sellauth::types::Product;
use indexmap::IndexMap;

/// Token -> banner lookup built once per assignment run.
///
/// First writer wins: when two banners answer to the same token ("cod" from
/// both a "Call Of Duty" and a "COD Accounts" banner), the banner earlier in
/// the prioritized list keeps it.
pub struct BannerAliasIndex<'a> {
    banners: &'a [LocalBanner],
    by_token: IndexMap<String, usize>,
}

impl<'a> BannerAliasIndex<'a> {
    pub fn new(banners: &'a [LocalBanner]) -> Self {
        let mut by_token: IndexMap<String, usize> = IndexMap::new();

        for (position, banner) in banners.iter().enumerate() {
            let mut tokens = alias_tokens_for_label(&banner.name);
            for extra in [
                normalize_alias_token(&banner.slug),
                normalize_alias_token(&banner.name),
            ] {
                if !extra.is_empty() && !tokens.contains(&extra) {
                    tokens.push(extra);
                }
            }

            for token in tokens {
                by_token.entry(token).or_insert(position);
            }
        }

        Self { banners, by_token }
    }

    pub fn lookup(&self, token: &str) -> Option<&'a LocalBanner> {
        self.by_token
            .get(token)
            .map(|&position| &self.banners[position])
    }

    #[cfg(test)]
    fn token_count(&self) -> usize {
        self.by_token.len()
    }
}

/// Tier 1: the product's own group/category labels, tried as slugs first and
/// then as raw labels, against the exact-token index.
fn match_identity_labels<'a>(
    product: &Product,
    index: &BannerAliasIndex<'a>,
) -> Option<&'a LocalBanner> {
    let candidates = [
        to_game_slug(&product.group_name),
        to_game_slug(&product.category_name),
        product.group_name.clone(),
        product.category_name.clone(),
    ];

    for candidate in candidates.iter().filter(|c| !c.is_empty()) {
        let token = normalize_alias_token(candidate);
        if token.is_empty() {
            continue;
        }
        if let Some(banner) = index.lookup(&token) {
            return Some(banner);
        }
    }
    None
}

/// Tier 2: scan the combined product text token by token, also probing each
/// adjacent pair and triple so multi-word category names are found even when
/// the provider spells them as separate words.
fn match_text_windows<'a>(
    product: &Product,
    index: &BannerAliasIndex<'a>,
) -> Option<&'a LocalBanner> {
    let text = format!(
        "{} {} {} {}",
        product.name, product.description, product.group_name, product.category_name
    )
    .to_lowercase();
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    for position in 0..tokens.len() {
        if let Some(banner) = index.lookup(tokens[position]) {
            return Some(banner);
        }

        let pair = format!(
            "{}{}",
            tokens[position],
            tokens.get(position + 1).copied().unwrap_or("")
        );
        if let Some(banner) = index.lookup(&pair) {
            return Some(banner);
        }

        let triple = format!(
            "{}{}",
            pair,
            tokens.get(position + 2).copied().unwrap_or("")
        );
        if let Some(banner) = index.lookup(&triple) {
            return Some(banner);
        }
    }
    None
}

/// Tier 3: stable arbitrary placement so unmatched products still render
/// somewhere consistent.
fn fallback_banner<'a>(product: &Product, banners: &'a [LocalBanner]) -> &'a LocalBanner {
    let seed = product.id.unsigned_abs() as usize + product.name.chars().count();
    &banners[seed % banners.len()]
}

/// The full matcher chain. Returns `None` only when there are no banners.
pub fn find_banner_for_product<'a>(
    product: &Product,
    banners: &'a [LocalBanner],
    index: &BannerAliasIndex<'a>,
) -> Option<&'a LocalBanner> {
    if banners.is_empty() {
        return None;
    }

    match_identity_labels(product, index)
        .or_else(|| match_text_windows(product, index))
        .or_else(|| Some(fallback_banner(product, banners)))
}

/// Rewrite each product's group/category identity to its matched banner.
/// Product images are kept unless missing or pointing at the generic
/// `/games/` placeholders, in which case the banner art takes over.
pub fn assign_products_to_banners(
    products: Vec<Product>,
    banners: &[LocalBanner],
) -> Vec<Product> {
    if banners.is_empty() {
        return products;
    }
    let index = BannerAliasIndex::new(banners);

    products
        .into_iter()
        .map(|mut product| {
            let Some(banner) = find_banner_for_product(&product, banners, &index) else {
                return product;
            };

            if product.image.is_empty() || product.image.starts_with("/games/") {
                product.image = banner.image_url.clone();
            }
            product.group_id = Some(banner.group_id);
            product.group_name = banner.name.clone();
            product.category_id = Some(banner.category_id);
            product.category_name = banner.name.clone();
            product
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::banners::{CATEGORY_ID_BASE, GROUP_ID_BASE};

    fn banner(position: i64, name: &str) -> LocalBanner {
        LocalBanner {
            name: name.to_string(),
            slug: to_game_slug(name),
            image_url: format!("/pd/{}.png", to_game_slug(name)),
            group_id: GROUP_ID_BASE + position,
            category_id: CATEGORY_ID_BASE + position,
        }
    }

    fn product(id: i64, name: &str, description: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image: String::new(),
            price: Some(10.0),
            currency: "USD".to_string(),
            stock: Some(5),
            group_id: None,
            group_name: String::new(),
            category_id: None,
            category_name: String::new(),
            variants: Vec::new(),
        }
    }

    fn grid() -> Vec<LocalBanner> {
        vec![
            banner(1, "Apex"),
            banner(2, "Call Of Duty"),
            banner(3, "Counter Strike 2"),
            banner(4, "Rainbow Six Siege"),
            banner(5, "Valorant"),
            banner(6, "Rust"),
        ]
    }

    #[test]
    fn group_label_match_beats_text_scan() {
        let banners = grid();
        let mut p = product(10, "Mystery Bundle", "works with valorant too");
        p.group_name = "Rust".to_string();

        let assigned = assign_products_to_banners(vec![p], &banners);
        assert_eq!(assigned[0].group_name, "Rust");
        assert_eq!(assigned[0].category_id, Some(CATEGORY_ID_BASE + 6));
    }

    #[test]
    fn alias_in_product_name_matches() {
        let banners = grid();
        let assigned = assign_products_to_banners(
            vec![product(11, "Valorant Elite Pack", "premium tooling")],
            &banners,
        );
        assert_eq!(assigned[0].group_name, "Valorant");
        assert_eq!(assigned[0].group_id, Some(GROUP_ID_BASE + 5));
    }

    #[test]
    fn split_compound_names_match_via_windows() {
        let banners = grid();

        // "rainbow six" only matches when adjacent tokens are joined.
        let assigned = assign_products_to_banners(
            vec![product(12, "Tom Clancy Rainbow Six unlock", "")],
            &banners,
        );
        assert_eq!(assigned[0].group_name, "Rainbow Six Siege");

        let assigned = assign_products_to_banners(
            vec![product(13, "best counter strike 2 config", "")],
            &banners,
        );
        assert_eq!(assigned[0].group_name, "Counter Strike 2");
    }

    #[test]
    fn unmatched_products_hash_to_a_stable_banner() {
        let banners = grid();
        let p = product(7, "Qqqq", "zzzz");

        // (|7| + 4) % 6 == 5 -> the sixth banner.
        let expected = &banners[(7 + 4) % 6];
        let first = assign_products_to_banners(vec![p.clone()], &banners);
        let second = assign_products_to_banners(vec![p], &banners);
        assert_eq!(first[0].group_name, expected.name);
        assert_eq!(first[0].group_name, second[0].group_name);
        assert_eq!(first[0].category_name, second[0].category_name);
    }

    #[test]
    fn image_kept_unless_placeholder() {
        let banners = grid();

        let mut keeps = product(20, "Valorant Prime", "");
        keeps.image = "https://cdn.example.com/art.png".to_string();
        let mut replaced = product(21, "Valorant Prime", "");
        replaced.image = "/games/fortnite.svg".to_string();
        let empty = product(22, "Valorant Prime", "");

        let assigned = assign_products_to_banners(vec![keeps, replaced, empty], &banners);
        assert_eq!(assigned[0].image, "https://cdn.example.com/art.png");
        assert_eq!(assigned[1].image, "/pd/valorant.png");
        assert_eq!(assigned[2].image, "/pd/valorant.png");
    }

    #[test]
    fn no_banners_leaves_products_untouched() {
        let p = product(30, "Valorant", "");
        let assigned = assign_products_to_banners(vec![p.clone()], &[]);
        assert_eq!(assigned, vec![p]);
    }

    #[test]
    fn first_banner_keeps_contested_tokens() {
        let first = banner(1, "Call Of Duty");
        let second = banner(2, "COD Accounts");
        let banners = vec![first, second];
        let index = BannerAliasIndex::new(&banners);

        assert_eq!(index.lookup("cod").unwrap().name, "Call Of Duty");
        // The later banner still owns tokens nobody claimed before it.
        assert_eq!(index.lookup("codaccounts").unwrap().name, "COD Accounts");
        assert!(index.token_count() > 2);
    }
}
