//! Validates Shopify credentials and prints the shop's metadata as JSON.
//!
//! Values come from flags, the environment, or a `.env` file in the working directory. Logs go
//! to stderr (`RUST_LOG` controls the filter); stdout carries only the JSON document.

// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use shopify_token_broker::{admin::ReqwestAdminClient, config::Args};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// A missing `.env` file is fine; real environment variables still apply.
	let _ = dotenvy::dotenv();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();

	let config = Args::parse().resolve()?;

	tracing::debug!(shop = %config.domain, api_version = %config.api_version, "Configuration loaded.");

	let client = ReqwestAdminClient::connect(&config).await?;
	let shop = client.shop_info().await?;

	tracing::info!(shop = %shop.name, "Credentials verified.");

	println!("{}", serde_json::to_string_pretty(&shop)?);

	Ok(())
}
