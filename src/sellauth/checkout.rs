//! Checkout payload assembly and redirect extraction.
//!
//! The storefront never processes payments itself; it forwards a sanitized
//! cart to the provider's checkout endpoint and hands the resulting hosted
//! invoice URL back to the browser.

use serde_json::{json, Map, Value};

/// One sanitized cart line. Values are whatever positive finite numbers the
/// client sent; a `variant_id` of zero means "no variant" and is omitted
/// from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutItem {
    pub product_id: f64,
    pub quantity: f64,
    pub variant_id: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutInput {
    pub payment_method: String,
    pub email: Option<String>,
    pub coupon_code: Option<String>,
    pub items: Vec<CheckoutItem>,
}

/// What the provider gave us back: a redirect target when one could be
/// located, plus the untouched response for the client to inspect.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub redirect_url: Option<String>,
    pub raw: Value,
}

/// Whole-valued numbers serialize as JSON integers, everything else as-is.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

/// Build the provider-side checkout payload.
///
/// A payment method that reads as a positive integer is sent as
/// `payment_method_id`; any other non-empty value is passed through as a
/// `gateway` key. Optional email/coupon fields are dropped when empty.
pub fn build_checkout_payload(input: &CheckoutInput) -> Value {
    let cart: Vec<Value> = input
        .items
        .iter()
        .map(|item| {
            let mut line = Map::new();
            line.insert("productId".to_string(), json_number(item.product_id));
            line.insert("quantity".to_string(), json_number(item.quantity));
            if let Some(variant_id) = item.variant_id.filter(|id| *id != 0.0 && id.is_finite()) {
                line.insert("variantId".to_string(), json_number(variant_id));
            }
            Value::Object(line)
        })
        .collect();

    let mut payload = Map::new();
    payload.insert("cart".to_string(), Value::Array(cart));
    if let Some(email) = input.email.as_deref().filter(|email| !email.is_empty()) {
        payload.insert("customer_email".to_string(), json!(email));
    }
    if let Some(coupon) = input.coupon_code.as_deref().filter(|coupon| !coupon.is_empty()) {
        payload.insert("coupon_code".to_string(), json!(coupon));
    }

    let method = input.payment_method.trim();
    if !method.is_empty() {
        match method.parse::<f64>() {
            Ok(numeric) if numeric.fract() == 0.0 && numeric > 0.0 => {
                payload.insert("payment_method_id".to_string(), json!(numeric as i64));
            }
            _ => {
                payload.insert("gateway".to_string(), json!(method));
            }
        }
    }

    Value::Object(payload)
}

/// Hunt for the hosted-invoice URL in the checkout response. The provider
/// has shipped it under several names over time.
pub fn extract_checkout_url(raw: &Value) -> Option<String> {
    let nested_invoice = raw.get("invoice").and_then(|invoice| invoice.get("url"));
    let candidates = [
        raw.get("url"),
        raw.get("checkout_url"),
        raw.get("checkoutUrl"),
        raw.get("payment_url"),
        raw.get("paymentUrl"),
        nested_invoice,
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(payment_method: &str) -> CheckoutInput {
        CheckoutInput {
            payment_method: payment_method.to_string(),
            email: None,
            coupon_code: None,
            items: vec![CheckoutItem {
                product_id: 31.0,
                quantity: 2.0,
                variant_id: None,
            }],
        }
    }

    #[test]
    fn numeric_payment_method_becomes_id() {
        let payload = build_checkout_payload(&input("17"));
        assert_eq!(payload["payment_method_id"], json!(17));
        assert!(payload.get("gateway").is_none());
    }

    #[test]
    fn gateway_strings_pass_through() {
        for method in ["crypto", "0", "-3", "12.5"] {
            let payload = build_checkout_payload(&input(method));
            assert_eq!(payload["gateway"], json!(method), "method {method}");
            assert!(payload.get("payment_method_id").is_none(), "method {method}");
        }
    }

    #[test]
    fn cart_lines_include_variant_only_when_present() {
        let mut base = input("crypto");
        base.items = vec![
            CheckoutItem { product_id: 1.0, quantity: 1.0, variant_id: Some(9.0) },
            CheckoutItem { product_id: 2.0, quantity: 3.0, variant_id: None },
            CheckoutItem { product_id: 3.0, quantity: 1.0, variant_id: Some(0.0) },
        ];

        let payload = build_checkout_payload(&base);
        let cart = payload["cart"].as_array().unwrap();
        assert_eq!(cart[0], json!({ "productId": 1, "quantity": 1, "variantId": 9 }));
        assert_eq!(cart[1], json!({ "productId": 2, "quantity": 3 }));
        assert_eq!(cart[2], json!({ "productId": 3, "quantity": 1 }));
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let mut base = input("crypto");
        base.items = vec![CheckoutItem { product_id: 4.0, quantity: 2.5, variant_id: None }];

        let payload = build_checkout_payload(&base);
        assert_eq!(
            serde_json::to_string(&payload["cart"]).unwrap(),
            r#"[{"productId":4,"quantity":2.5}]"#
        );
    }

    #[test]
    fn optional_fields_are_dropped_when_empty() {
        let mut with = input("crypto");
        with.email = Some("buyer@example.com".to_string());
        with.coupon_code = Some("SAVE10".to_string());
        let payload = build_checkout_payload(&with);
        assert_eq!(payload["customer_email"], json!("buyer@example.com"));
        assert_eq!(payload["coupon_code"], json!("SAVE10"));

        let mut without = input("crypto");
        without.email = Some(String::new());
        let payload = build_checkout_payload(&without);
        assert!(payload.get("customer_email").is_none());
        assert!(payload.get("coupon_code").is_none());
    }

    #[test]
    fn redirect_url_candidates_in_order() {
        use serde_json::json;

        assert_eq!(
            extract_checkout_url(&json!({ "url": "https://pay/1" })),
            Some("https://pay/1".to_string())
        );
        assert_eq!(
            extract_checkout_url(&json!({ "checkout_url": "https://pay/2" })),
            Some("https://pay/2".to_string())
        );
        assert_eq!(
            extract_checkout_url(&json!({ "invoice": { "url": "https://pay/3" } })),
            Some("https://pay/3".to_string())
        );
        // Empty strings are skipped in favor of later candidates.
        assert_eq!(
            extract_checkout_url(&json!({ "url": "", "paymentUrl": "https://pay/4" })),
            Some("https://pay/4".to_string())
        );
        assert_eq!(extract_checkout_url(&json!({ "status": "ok" })), None);
        assert_eq!(extract_checkout_url(&Value::Null), None);
    }
}
