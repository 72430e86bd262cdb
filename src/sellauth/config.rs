use crate::util::env as env_util;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.sellauth.com";

/// SellAuth connection settings, read once at process start and passed
/// explicitly into the data-loading components. Nothing else in the crate
/// reads these environment variables.
#[derive(Debug, Clone)]
pub struct SellAuthConfig {
    pub base_url: String,
    pub shop_id: String,
    pub api_key: String,
}

impl SellAuthConfig {
    /// Read `SELLAUTH_API_BASE_URL` / `SELLAUTH_SHOP_ID` / `SELLAUTH_API_KEY`.
    ///
    /// Missing shop id or key is not an error: the storefront switches to the
    /// demo catalog and never contacts the provider.
    pub fn from_env() -> Self {
        env_util::init_env();

        let base_url = env_util::env_opt("SELLAUTH_API_BASE_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if url::Url::parse(&base_url).is_err() {
            warn!(base_url = %base_url, "sellauth: SELLAUTH_API_BASE_URL does not parse as a URL");
        }

        let shop_id = env_util::env_opt("SELLAUTH_SHOP_ID")
            .map(|raw| raw.trim().to_string())
            .unwrap_or_default();
        let api_key = env_util::env_opt("SELLAUTH_API_KEY")
            .map(|raw| raw.trim().to_string())
            .unwrap_or_default();

        Self {
            base_url,
            shop_id,
            api_key,
        }
    }

    /// Config for tests and tools that inject credentials directly.
    pub fn new(
        base_url: impl Into<String>,
        shop_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            shop_id: shop_id.into(),
            api_key: api_key.into(),
        }
    }

    /// An explicitly unconfigured provider (demo/mock mode).
    pub fn unconfigured() -> Self {
        Self::new(DEFAULT_BASE_URL, "", "")
    }

    pub fn is_configured(&self) -> bool {
        !self.shop_id.is_empty() && !self.api_key.is_empty()
    }
}
