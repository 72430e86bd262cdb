// HTTP request handlers for API endpoints

use crate::api::models::*;
use crate::catalog::reviews::{reviews_from_products, DEFAULT_REVIEW_LIMIT};
use crate::sellauth::checkout::{CheckoutInput, CheckoutItem};
use crate::sellauth::client::SellAuthRequestError;
use crate::sellauth::normalize::as_number;
use crate::sellauth::storefront::StorefrontService;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, Result};
use serde_json::Value;
use std::time::Instant;

/// Shared handler state: the storefront service plus process start time.
pub struct AppState {
    pub service: StorefrontService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: StorefrontService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

/// Liveness endpoint, served on `/` and `/health`
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        provider_configured: state.service.is_configured(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// `GET /api/storefront` — assemble and return a fresh snapshot.
///
/// Always 200: provider trouble surfaces inside the body as demo data plus
/// warnings, never as an HTTP error. Explicitly uncacheable so the shop
/// always reflects dashboard changes.
pub async fn get_storefront(state: web::Data<AppState>) -> Result<HttpResponse> {
    let data = state.service.storefront_data().await;
    Ok(HttpResponse::Ok()
        .insert_header((
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, max-age=0",
        ))
        .json(data))
}

fn invalid(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

/// `quantity` defaults to 1 when missing or empty-ish (null, boolean, 0, "");
/// any other unparseable value poisons the item instead.
fn quantity_for(item: &Value) -> f64 {
    match item.get("quantity") {
        None | Some(Value::Null) | Some(Value::Bool(_)) => 1.0,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => 1.0,
        Some(Value::String(s)) if s.is_empty() => 1.0,
        Some(other) => as_number(other).unwrap_or(f64::NAN),
    }
}

/// Coerce raw cart lines, dropping any that lack a positive finite product id
/// and quantity.
fn sanitize_items(raw_items: &[Value]) -> Vec<CheckoutItem> {
    raw_items
        .iter()
        .filter_map(|item| {
            let product_id = item
                .get("productId")
                .and_then(as_number)
                .unwrap_or(f64::NAN);
            let quantity = quantity_for(item);
            if !product_id.is_finite()
                || product_id <= 0.0
                || !quantity.is_finite()
                || quantity <= 0.0
            {
                return None;
            }
            Some(CheckoutItem {
                product_id,
                quantity,
                variant_id: item.get("variantId").and_then(as_number),
            })
        })
        .collect()
}

/// `POST /api/checkout` — validate the cart, delegate to the provider, and
/// forward the hosted-invoice URL.
///
/// The body is probed as loose JSON rather than a typed extractor so the
/// field-by-field coercion and the exact validation messages stay under our
/// control. Provider rejections keep their upstream status code.
pub async fn create_checkout(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let parsed: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(error) => {
            return Ok(
                HttpResponse::InternalServerError().json(ErrorResponse::new(error.to_string()))
            );
        }
    };

    let Some(payment_method) = parsed
        .get("paymentMethod")
        .and_then(Value::as_str)
        .filter(|method| !method.is_empty())
    else {
        return Ok(invalid("paymentMethod is required."));
    };

    let Some(raw_items) = parsed
        .get("items")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
    else {
        return Ok(invalid("At least one cart item is required."));
    };

    let items = sanitize_items(raw_items);
    if items.is_empty() {
        return Ok(invalid("Cart items are invalid."));
    }

    let input = CheckoutInput {
        payment_method: payment_method.to_string(),
        email: parsed
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string),
        coupon_code: parsed
            .get("couponCode")
            .and_then(Value::as_str)
            .map(str::to_string),
        items,
    };

    match state.service.create_checkout(&input).await {
        Ok(outcome) => {
            let message = if outcome.redirect_url.is_some() {
                "Checkout created successfully."
            } else {
                "Checkout created. No redirect URL returned."
            };
            Ok(HttpResponse::Ok().json(CheckoutResponse {
                success: true,
                message: message.to_string(),
                redirect_url: outcome.redirect_url,
                data: outcome.raw,
            }))
        }
        Err(error) => {
            if let Some(request_error) = error.downcast_ref::<SellAuthRequestError>() {
                let status = StatusCode::from_u16(request_error.status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                return Ok(HttpResponse::build(status)
                    .json(ErrorResponse::new(request_error.to_string())));
            }
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::new(error.to_string())))
        }
    }
}

/// `GET /api/sellauth-health` — can we authenticate against the provider?
pub async fn sellauth_health(state: web::Data<AppState>) -> Result<HttpResponse> {
    if !state.service.is_configured() {
        return Ok(HttpResponse::BadRequest().json(ProviderHealthResponse {
            ok: false,
            configured: false,
            status: None,
            message: "Missing SELLAUTH_SHOP_ID or SELLAUTH_API_KEY".to_string(),
            hint: None,
        }));
    }

    match state.service.probe_provider().await {
        Ok((status, body)) => {
            if !(200..300).contains(&status) {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .unwrap_or("SellAuth health check failed")
                    .to_string();
                let hint = (status == 401).then(|| {
                    "API key invalid/expired, wrong shop ID, or key not scoped for this shop"
                        .to_string()
                });
                let http_status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                return Ok(HttpResponse::build(http_status).json(ProviderHealthResponse {
                    ok: false,
                    configured: true,
                    status: Some(status),
                    message,
                    hint,
                }));
            }

            Ok(HttpResponse::Ok().json(ProviderHealthResponse {
                ok: true,
                configured: true,
                status: Some(status),
                message: "SellAuth authentication looks good".to_string(),
                hint: None,
            }))
        }
        Err(error) => Ok(
            HttpResponse::InternalServerError().json(ProviderHealthResponse {
                ok: false,
                configured: true,
                status: None,
                message: error.to_string(),
                hint: None,
            }),
        ),
    }
}

/// `GET /api/reviews` — review feed derived from the current snapshot.
pub async fn get_reviews(
    state: web::Data<AppState>,
    query: web::Query<ReviewsQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_REVIEW_LIMIT).clamp(1, 100);
    let data = state.service.storefront_data().await;
    let reviews = reviews_from_products(&data.products, limit);
    Ok(HttpResponse::Ok().json(ReviewsResponse {
        success: true,
        reviews,
    }))
}
