//! Curated category alias tables and token normalization.
//!
//! Product text coming back from the shop API is free-form ("COD UAV Lite",
//! "rainbow six acc", "Valo 7d") while the storefront navigates a fixed set
//! of curated categories. Everything here reduces both sides to normalized
//! alias tokens so they can meet in the middle.

use crate::catalog::slug::to_game_slug;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical slug -> storefront display name.
const DISPLAY_NAME_BY_SLUG: &[(&str, &str)] = &[
    ("apex", "Apex"),
    ("arc-raiders", "Arc Raiders"),
    ("call-of-duty", "Call Of Duty"),
    ("counter-strike-2", "Counter Strike 2"),
    ("dayz", "DayZ"),
    ("fivem", "FiveM"),
    ("fortnite", "Fortnite"),
    ("rainbow-six-siege", "Rainbow Six Siege"),
    ("roblox", "Roblox"),
    ("hwid-spoofers", "HWID Spoofers"),
    ("lol", "League of Legends"),
    ("pubg", "PUBG"),
    ("squad", "Squad"),
    ("valorant", "Valorant"),
    ("rust", "Rust"),
];

/// Abbreviations and common misspellings seen in product titles.
const ALIASES_BY_SLUG: &[(&str, &[&str])] = &[
    ("apex", &["apex", "apexlegends"]),
    ("arc-raiders", &["arc", "arcraiders", "ark", "arkraiders"]),
    ("call-of-duty", &["cod", "callofduty", "mw", "bo6", "bo7"]),
    ("counter-strike-2", &["cs2", "csgo", "counterstrike2", "counterstrike"]),
    ("dayz", &["dayz"]),
    ("fivem", &["5m", "five", "fivem"]),
    ("fortnite", &["fortnite", "fn"]),
    ("rainbow-six-siege", &["r6", "r6s", "rainbowsix", "siege", "tomclancy"]),
    ("roblox", &["roblox", "rbx"]),
    (
        "hwid-spoofers",
        &["hwid", "spoofer", "spoofers", "hwidspoofer", "hwidspoofers", "spoof"],
    ),
    ("lol", &["lol", "league", "leagueoflegends"]),
    ("pubg", &["pubg", "battlegrounds", "playerunknown"]),
    ("squad", &["squad"]),
    ("valorant", &["val", "valo", "valorant"]),
    ("rust", &["rust"]),
];

/// Fixed ordering for the category grid; slugs not listed sort after these,
/// alphabetically.
pub const PREFERRED_CATEGORY_SLUGS: &[&str] = &[
    "apex",
    "arc-raiders",
    "call-of-duty",
    "counter-strike-2",
    "dayz",
    "fivem",
    "fortnite",
    "hwid-spoofers",
    "lol",
    "pubg",
    "rainbow-six-siege",
    "roblox",
    "rust",
    "valorant",
];

/// Names used to pad the banner set when local image sources come up short.
pub const FALLBACK_CATEGORY_NAMES: &[&str] = &[
    "Apex",
    "Arc Raiders",
    "Call Of Duty",
    "Counter Strike 2",
    "DayZ",
    "FiveM",
    "Fortnite",
    "Rainbow Six Siege",
    "HWID Spoofers",
    "League of Legends",
    "PUBG",
    "Roblox",
    "Valorant",
    "Rust",
];

/// Lowercase a label and strip everything that is not ASCII alphanumeric.
/// This is the key format for every alias lookup.
pub fn normalize_alias_token(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

struct AliasTable {
    to_slug: HashMap<String, &'static str>,
    /// All known alias tokens, longest first, for substring resolution.
    match_candidates: Vec<String>,
}

static ALIAS_TABLE: OnceLock<AliasTable> = OnceLock::new();

fn alias_table() -> &'static AliasTable {
    ALIAS_TABLE.get_or_init(|| {
        let mut to_slug: HashMap<String, &'static str> = HashMap::new();
        let mut ordered: Vec<String> = Vec::new();

        for &(slug, display_name) in DISPLAY_NAME_BY_SLUG {
            let mut tokens: Vec<String> = Vec::new();
            let mut push = |value: &str, tokens: &mut Vec<String>| {
                let normalized = normalize_alias_token(value);
                if !normalized.is_empty() && !tokens.contains(&normalized) {
                    tokens.push(normalized);
                }
            };

            push(slug, &mut tokens);
            push(display_name, &mut tokens);
            for segment in slug.split('-') {
                push(segment, &mut tokens);
            }
            for alias in aliases_for_slug(slug) {
                push(alias, &mut tokens);
            }

            for token in tokens {
                if !to_slug.contains_key(&token) {
                    ordered.push(token.clone());
                }
                to_slug.insert(token, slug);
            }
        }

        // Stable by-length sort keeps first-registration order for ties.
        ordered.sort_by(|a, b| b.len().cmp(&a.len()));

        AliasTable {
            to_slug,
            match_candidates: ordered,
        }
    })
}

/// The curated alias list for a canonical slug, empty for unknown slugs.
pub fn aliases_for_slug(slug: &str) -> &'static [&'static str] {
    ALIASES_BY_SLUG
        .iter()
        .find(|(candidate, _)| *candidate == slug)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Display name for a canonical slug, if curated.
pub fn display_name_for_slug(slug: &str) -> Option<&'static str> {
    DISPLAY_NAME_BY_SLUG
        .iter()
        .find(|(candidate, _)| *candidate == slug)
        .map(|(_, name)| *name)
}

/// Canonical slug a normalized token belongs to, if any.
pub fn slug_for_alias_token(token: &str) -> Option<&'static str> {
    alias_table().to_slug.get(token).copied()
}

/// Resolve a free-text label to a curated display name.
///
/// Exact token lookup first, then substring containment against every known
/// alias token (longest first, so "counterstrike2" beats "cs2" inside
/// "bestcounterstrike2store").
pub fn resolve_display_name(value: &str) -> Option<&'static str> {
    let token = normalize_alias_token(value);
    if token.is_empty() {
        return None;
    }

    let table = alias_table();
    if let Some(slug) = table.to_slug.get(&token) {
        return display_name_for_slug(slug);
    }

    for alias in &table.match_candidates {
        if !token.contains(alias.as_str()) {
            continue;
        }
        if let Some(slug) = table.to_slug.get(alias) {
            if let Some(name) = display_name_for_slug(slug) {
                return Some(name);
            }
        }
    }

    None
}

/// Every alias token a banner label should answer to: the label itself, its
/// slug, each slug segment, and the curated aliases of the canonical slug the
/// label resolves to. Order is deterministic; duplicates removed.
pub fn alias_tokens_for_label(label: &str) -> Vec<String> {
    fn push(tokens: &mut Vec<String>, value: &str) {
        let normalized = normalize_alias_token(value);
        if !normalized.is_empty() && !tokens.contains(&normalized) {
            tokens.push(normalized);
        }
    }

    let slug = to_game_slug(label);
    let mut tokens = Vec::new();

    push(&mut tokens, label);
    push(&mut tokens, &slug);
    for segment in slug.split('-') {
        push(&mut tokens, segment);
    }

    let canonical = slug_for_alias_token(&normalize_alias_token(&slug)).unwrap_or(slug.as_str());
    for alias in aliases_for_slug(canonical) {
        push(&mut tokens, alias);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_to_alphanumerics() {
        assert_eq!(normalize_alias_token("Rainbow-Six: Siege!"), "rainbowsixsiege");
        assert_eq!(normalize_alias_token("R6"), "r6");
        assert_eq!(normalize_alias_token("---"), "");
    }

    #[test]
    fn exact_alias_resolution() {
        assert_eq!(resolve_display_name("cod"), Some("Call Of Duty"));
        assert_eq!(resolve_display_name("r6"), Some("Rainbow Six Siege"));
        assert_eq!(resolve_display_name("hwid spoofer"), Some("HWID Spoofers"));
        assert_eq!(resolve_display_name("unknown game"), None);
    }

    #[test]
    fn substring_resolution_prefers_longer_aliases() {
        // "counterstrike2" and "cs2" are both embedded; the longer token wins.
        assert_eq!(
            resolve_display_name("mega counterstrike2 bundle"),
            Some("Counter Strike 2")
        );
        assert_eq!(resolve_display_name("valo-shop-key"), Some("Valorant"));
    }

    #[test]
    fn label_tokens_include_canonical_aliases() {
        let tokens = alias_tokens_for_label("League of Legends");
        assert!(tokens.contains(&"leagueoflegends".to_string()));
        assert!(tokens.contains(&"lol".to_string()));
        assert!(tokens.contains(&"league".to_string()));

        let tokens = alias_tokens_for_label("Rainbow Six Siege");
        assert!(tokens.contains(&"r6".to_string()));
        assert!(tokens.contains(&"siege".to_string()));
    }

    #[test]
    fn fallback_names_all_have_unique_slugs() {
        let mut seen = std::collections::HashSet::new();
        for name in FALLBACK_CATEGORY_NAMES {
            assert!(seen.insert(to_game_slug(name)), "duplicate slug for {name}");
        }
        assert_eq!(FALLBACK_CATEGORY_NAMES.len(), 14);
    }
}
