use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::Path;
use storefront_api::catalog::banners::{load_local_banners, DEFAULT_BANNER_LIMIT};
use storefront_api::catalog::reviews::{reviews_from_products, DEFAULT_REVIEW_LIMIT};
use storefront_api::sellauth::config::SellAuthConfig;
use storefront_api::sellauth::storefront::StorefrontService;
use storefront_api::util::env as env_util;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sf", version, about = "Storefront admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// List the banner categories discovered under an asset root
    Banners {
        /// Directory holding public/pd, pd.png and public/games
        #[arg(long, default_value = ".")]
        root: String,
        /// Maximum number of banners to emit (default: 14)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Assemble the full storefront payload and print it as JSON
    Snapshot {
        /// Directory holding the banner art
        #[arg(long, default_value = ".")]
        root: String,
        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Probe SellAuth authentication with the configured credentials
    Health,
    /// Print the derived review feed for the current catalog
    Reviews {
        /// Directory holding the banner art
        #[arg(long, default_value = ".")]
        root: String,
        /// Number of reviews to generate (default: 16)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    storefront_api::tracing::init_cli_tracing("info");

    if std::env::var_os("SF_LIST_SUBCOMMANDS").is_some() {
        let names: Vec<String> = Cli::command()
            .get_subcommands()
            .map(|cmd| cmd.get_name().to_string())
            .collect();
        eprintln!("available subcommands: {:?}", names);
        return Ok(());
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Banners { root, limit } => {
            let limit = limit.unwrap_or(DEFAULT_BANNER_LIMIT);
            let banners = load_local_banners(Path::new(&root), limit);
            for banner in &banners {
                println!("{:<28} {:<28} {}", banner.name, banner.slug, banner.image_url);
            }
            info!(count = banners.len(), "local banners discovered");
        }
        Commands::Snapshot { root, pretty } => {
            let config = SellAuthConfig::from_env();
            if !config.is_configured() {
                warn!("SellAuth credentials not set; snapshot uses the demo catalog");
            }
            let service = StorefrontService::new(config, root)?;
            let data = service.storefront_data().await;
            let rendered = if pretty {
                serde_json::to_string_pretty(&data)?
            } else {
                serde_json::to_string(&data)?
            };
            println!("{rendered}");
        }
        Commands::Health => {
            let config = SellAuthConfig::from_env();
            if !config.is_configured() {
                bail!("Missing SELLAUTH_SHOP_ID or SELLAUTH_API_KEY");
            }
            let service = StorefrontService::new(config, ".")?;
            let (status, body) = service.probe_provider().await?;
            if (200..300).contains(&status) {
                info!(status, "SellAuth authentication looks good");
            } else {
                warn!(status, body = %body, "SellAuth health check failed");
                bail!("SellAuth health check failed with status {status}");
            }
        }
        Commands::Reviews { root, limit } => {
            let config = SellAuthConfig::from_env();
            let service = StorefrontService::new(config, root)?;
            let data = service.storefront_data().await;
            let limit = limit.unwrap_or(DEFAULT_REVIEW_LIMIT);
            let reviews = reviews_from_products(&data.products, limit);
            println!("{}", serde_json::to_string_pretty(&reviews)?);
        }
    }

    Ok(())
}
