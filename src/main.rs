use anyhow::Result;
use storefront_api::api::ApiServer;
use storefront_api::sellauth::config::SellAuthConfig;
use storefront_api::sellauth::storefront::StorefrontService;
use storefront_api::util::env as env_util;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    storefront_api::tracing::init_tracing("info")?;

    tracing::info!("Initializing storefront API server");

    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();

    // Load configuration from environment
    let server = ApiServer::from_env()?;
    let config = SellAuthConfig::from_env();
    if !config.is_configured() {
        tracing::warn!(
            "SELLAUTH_SHOP_ID / SELLAUTH_API_KEY not set; serving the demo catalog"
        );
    }

    let asset_root =
        env_util::env_opt("STOREFRONT_ASSET_ROOT").unwrap_or_else(|| ".".to_string());
    let service = StorefrontService::new(config, asset_root)?;

    // Start HTTP server
    server.run(service).await?;

    Ok(())
}
