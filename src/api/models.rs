// API request/response models (DTOs)

use crate::catalog::reviews::StoreReview;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Liveness response for `/` and `/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider_configured: bool,
    pub uptime_seconds: u64,
}

/// Body for every rejected request: `{success:false, message}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Successful checkout response. `redirectUrl` is serialized even when null
/// so clients can key on its presence.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub redirect_url: Option<String>,
    pub data: Value,
}

/// Provider credential diagnostics for `/api/sellauth-health`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderHealthResponse {
    pub ok: bool,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub success: bool,
    pub reviews: Vec<StoreReview>,
}
