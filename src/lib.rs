//! Shopify Admin API access layer.
//!
//! A custom app authenticates either with client credentials, exchanged for short-lived tokens
//! that [`provider::RenewingProvider`] caches and renews before they expire, or with a
//! pre-issued token served by [`provider::StaticProvider`]. [`admin::AdminClient`] signs every
//! GraphQL request with whichever provider [`config::Config`] selected.
//!
//! ```no_run
//! # async fn run() -> shopify_token_broker::error::Result<()> {
//! use shopify_token_broker::{admin::ReqwestAdminClient, config::Config};
//!
//! let config = Config::from_env()?;
//! let client = ReqwestAdminClient::connect(&config).await?;
//! let shop = client.shop_info().await?;
//!
//! println!("{} ({})", shop.name, shop.myshopify_domain);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod admin;
pub mod auth;
pub mod clock;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod ext;
pub mod gid;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod source;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		admin::AdminClient,
		auth::{ApiVersion, ClientId, ShopDomain},
		clock::{Clock, ManualClock},
		endpoints::ShopEndpoints,
		ext::ShopifyHeaderSigner,
		http::ReqwestHttpClient,
		oauth::{ReqwestTransportErrorMapper, ShopifyTokenSource},
		provider::{CredentialProvider, RenewingProvider},
		source::CredentialSource,
	};

	/// Client ID used across integration tests.
	pub const TEST_CLIENT_ID: &str = "test-client";
	/// Client secret used across integration tests.
	pub const TEST_CLIENT_SECRET: &str = "test-secret";

	/// Admin client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAdminClient = AdminClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds endpoints that point at a local mock server instead of `*.myshopify.com`.
	pub fn test_endpoints(base: &str) -> ShopEndpoints {
		let domain = ShopDomain::new("test-shop.myshopify.com")
			.expect("Test shop domain should be valid.");
		let token = Url::parse(&format!("{base}/admin/oauth/access_token"))
			.expect("Mock token endpoint should parse.");
		let graphql = Url::parse(&format!("{base}/admin/api/2026-01/graphql.json"))
			.expect("Mock GraphQL endpoint should parse.");

		ShopEndpoints::with_urls(domain, ApiVersion::default(), token, graphql)
	}

	/// Builds a renewing provider backed by the reqwest token source and a manual clock.
	pub fn build_test_renewing_provider(
		endpoints: &ShopEndpoints,
		start: OffsetDateTime,
	) -> (Arc<RenewingProvider>, Arc<ManualClock>) {
		let client_id = ClientId::new(TEST_CLIENT_ID).expect("Test client ID should be valid.");
		let source: Arc<dyn CredentialSource> = Arc::new(ShopifyTokenSource::new(
			endpoints.token.clone(),
			client_id,
			TEST_CLIENT_SECRET,
		));
		let clock = Arc::new(ManualClock::new(start));
		let dyn_clock: Arc<dyn Clock> = clock.clone();

		(Arc::new(RenewingProvider::new(source).with_clock(dyn_clock)), clock)
	}

	/// Constructs an [`AdminClient`] that signs requests through `provider`.
	pub fn build_test_admin_client(
		endpoints: ShopEndpoints,
		provider: Arc<dyn CredentialProvider>,
	) -> ReqwestTestAdminClient {
		AdminClient::<ReqwestHttpClient, ReqwestTransportErrorMapper>::with_http_client(
			endpoints,
			provider,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
		.with_signer(Arc::new(ShopifyHeaderSigner))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeSet,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
#[cfg(feature = "cli")]
use {color_eyre as _, dotenvy as _, tokio as _, tracing_subscriber as _};
