//! Tolerant normalization of SellAuth API payloads.
//!
//! The upstream response shape is not contractually stable: fields go
//! missing, get renamed between API revisions (`group_id` vs
//! `shop_group_id`), numbers arrive as strings, and collections come wrapped
//! in several envelope/pagination conventions. Everything here probes raw
//! `serde_json::Value`s and degrades field-by-field; the only hard rejection
//! is a record without a parseable numeric `id`.

use crate::sellauth::types::{Category, Group, ImageRef, PaymentMethod, Product, Variant};
use serde_json::Value;

static NULL: Value = Value::Null;

/// Numeric coercion: finite numbers pass through, numeric strings parse
/// (whitespace trimmed), everything else is absent.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Integer coercion for ids and stock counts; fractional values truncate.
pub fn as_integer(value: &Value) -> Option<i64> {
    as_number(value).map(|f| f.trunc() as i64)
}

fn number_field(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(as_number)
}

fn integer_field(record: &Value, key: &str) -> Option<i64> {
    record.get(key).and_then(as_integer)
}

/// String field access; anything that is not a JSON string yields "".
fn string_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

/// String field keeping presence: an explicit `""` is `Some("")`. Use this
/// where a default applies only to missing/non-string values, not [`pick`]
/// chains (which skip empties the way `||` does).
fn string_field_opt<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// First field among `keys` that is present and not null, else `Null`.
fn first_of<'a>(record: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
        .unwrap_or(&NULL)
}

/// First non-empty candidate, mirroring JS-style `a || b || c` chains over
/// strings.
fn pick<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|s| !s.is_empty())
}

/// Locate the actual array of items inside a response envelope.
///
/// Tries, in order: the value itself; each wrapper key as a direct array;
/// each wrapper key's nested `data`; then the same two probes under a
/// top-level `data` record. Empty arrays are skipped so a later location can
/// still win. Returns an empty vec when nothing matches; never errors.
pub fn unwrap_collection(value: &Value, keys: &[&str]) -> Vec<Value> {
    if let Some(items) = non_empty_array(value) {
        return items.clone();
    }

    for key in keys {
        if let Some(node) = value.get(key) {
            if let Some(items) = non_empty_array(node) {
                return items.clone();
            }
            if let Some(items) = node.get("data").and_then(non_empty_array) {
                return items.clone();
            }
        }
    }

    if let Some(data) = value.get("data") {
        for key in keys {
            if let Some(node) = data.get(key) {
                if let Some(items) = non_empty_array(node) {
                    return items.clone();
                }
                if let Some(items) = node.get("data").and_then(non_empty_array) {
                    return items.clone();
                }
            }
        }
    }

    Vec::new()
}

fn non_empty_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array().filter(|items| !items.is_empty())
}

/// Keyword-based placeholder art for records the provider ships without an
/// image. The storefront always has these SVGs available.
pub fn fallback_game_image(label: &str) -> &'static str {
    let normalized = label.to_lowercase();
    if normalized.contains("fortnite") {
        return "/games/fortnite.svg";
    }
    if normalized.contains("hwid") || normalized.contains("spoofer") {
        return "/games/hwid.svg";
    }
    if normalized.contains("duty") || normalized.contains("cod") {
        return "/games/cod.svg";
    }
    if normalized.contains("rust") {
        return "/games/rust.svg";
    }
    "/games/fortnite.svg"
}

pub fn parse_variant(raw: &Value) -> Option<Variant> {
    let id = integer_field(raw, "id")?;
    Some(Variant {
        id,
        name: string_field_opt(raw, "name").unwrap_or("Default").to_string(),
        price: number_field(raw, "price")
            .or_else(|| number_field(raw, "sale_price"))
            .or_else(|| number_field(raw, "amount")),
        stock: integer_field(raw, "stock"),
    })
}

pub fn parse_group(raw: &Value) -> Option<Group> {
    let id = integer_field(raw, "id")?;

    let image_value = raw.get("image").unwrap_or(&NULL);
    let image_url = pick(&[
        string_field(image_value, "url"),
        string_field(image_value, "src"),
        image_value.as_str().unwrap_or(""),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| fallback_game_image(string_field(raw, "name")).to_string());

    Some(Group {
        id,
        name: string_field_opt(raw, "name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("Group {id}")),
        description: string_field(raw, "description").to_string(),
        image: Some(ImageRef::new(image_url)),
    })
}

pub fn parse_category(raw: &Value) -> Option<Category> {
    let id = integer_field(raw, "id")?;

    let image_value = raw.get("image").unwrap_or(&NULL);
    let image_url = pick(&[
        string_field(image_value, "url"),
        string_field(image_value, "src"),
        image_value.as_str().unwrap_or(""),
    ]);

    Some(Category {
        id,
        name: string_field_opt(raw, "name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("Category {id}")),
        description: string_field(raw, "description").to_string(),
        image: image_url.map(ImageRef::new),
    })
}

pub fn parse_product(raw: &Value) -> Option<Product> {
    let id = integer_field(raw, "id")?;

    let group = first_of(raw, &["group", "shop_group"]);
    let category = first_of(raw, &["category", "shop_category"]);

    let group_id = integer_field(raw, "group_id")
        .or_else(|| integer_field(raw, "shop_group_id"))
        .or_else(|| integer_field(group, "id"));
    let category_id = integer_field(raw, "category_id")
        .or_else(|| integer_field(raw, "shop_category_id"))
        .or_else(|| integer_field(category, "id"));

    let group_name = string_field(group, "name").to_string();
    let category_name = string_field(category, "name").to_string();
    let name = string_field_opt(raw, "name")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Product {id}"));

    let image_value = raw.get("image").unwrap_or(&NULL);
    let image = pick(&[
        string_field(image_value, "url"),
        string_field(image_value, "src"),
        image_value.as_str().unwrap_or(""),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| {
        fallback_game_image(pick(&[group_name.as_str(), name.as_str()]).unwrap_or("")).to_string()
    });

    let variants: Vec<Variant> = raw
        .get("variants")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_variant).collect())
        .unwrap_or_default();

    let price = number_field(raw, "price")
        .or_else(|| number_field(raw, "sale_price"))
        .or_else(|| number_field(raw, "amount"))
        .or_else(|| variants.first().and_then(|variant| variant.price));

    Some(Product {
        id,
        name,
        description: string_field(raw, "description").to_string(),
        image,
        price,
        currency: string_field_opt(raw, "currency").unwrap_or("USD").to_string(),
        stock: integer_field(raw, "stock"),
        group_id,
        group_name,
        category_id,
        category_name,
        variants,
    })
}

pub fn parse_payment_method(raw: &Value) -> Option<PaymentMethod> {
    let numeric_id = number_field(raw, "id")
        .or_else(|| number_field(raw, "payment_method_id"))
        .or_else(|| number_field(raw, "paymentMethodId"));
    let numeric_id_str = numeric_id
        .map(|n| (n.trunc() as i64).to_string())
        .unwrap_or_default();

    let id = pick(&[
        numeric_id_str.as_str(),
        string_field(raw, "id"),
        string_field(raw, "payment_method_id"),
        string_field(raw, "paymentMethodId"),
        string_field(raw, "type"),
        string_field(raw, "gateway"),
        string_field(raw, "key"),
        string_field(raw, "name"),
    ])?
    .to_string();

    let name = pick(&[
        string_field(raw, "display_name"),
        string_field(raw, "displayName"),
        string_field(raw, "label"),
        string_field(raw, "gateway"),
        string_field(raw, "name"),
        id.as_str(),
    ])
    .unwrap_or("")
    .to_string();

    // First present (non-null) flag wins; absent means enabled.
    let enabled = match first_of(
        raw,
        &[
            "enabled",
            "active",
            "is_active",
            "isActive",
            "is_enabled",
            "isEnabled",
        ],
    ) {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f > 0.0).unwrap_or(true),
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => true,
    };

    Some(PaymentMethod {
        id: id.trim().to_string(),
        name,
        enabled,
    })
}
