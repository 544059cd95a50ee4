//! Startup configuration: shop, API version, and which credential mode to run in.
//!
//! Raw values are collected into [`ConfigSources`] (from the environment, or from the command
//! line with the `cli` feature) and resolved once into a validated [`Config`]. Client credentials
//! win over a static access token when both are present. A blank value counts as unset.

// self
use crate::{
	_prelude::*,
	auth::{ApiVersion, ClientId, ShopDomain, TokenSecret},
	error::ConfigError,
};

/// Environment variable holding the shop domain.
pub const ENV_DOMAIN: &str = "MYSHOPIFY_DOMAIN";
/// Environment variable holding the Admin API version.
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";
/// Environment variable holding the custom app's client ID.
pub const ENV_CLIENT_ID: &str = "SHOPIFY_CLIENT_ID";
/// Environment variable holding the custom app's client secret.
pub const ENV_CLIENT_SECRET: &str = "SHOPIFY_CLIENT_SECRET";
/// Environment variable holding a pre-issued access token.
pub const ENV_ACCESS_TOKEN: &str = "SHOPIFY_ACCESS_TOKEN";

/// Validated configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// Shop to talk to.
	pub domain: ShopDomain,
	/// Admin API version.
	pub api_version: ApiVersion,
	/// Credential mode.
	pub auth: AuthConfig,
}
impl Config {
	/// Resolves configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		ConfigSources::from_env().resolve()
	}
}

/// Credential mode; secrets are redacted from `Debug`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthConfig {
	/// Exchange client credentials for short-lived tokens.
	ClientCredentials {
		/// Custom app client ID.
		client_id: ClientId,
		/// Custom app client secret.
		client_secret: TokenSecret,
	},
	/// Use a pre-issued token as-is.
	Static {
		/// Admin API access token (`shpat_...`).
		access_token: TokenSecret,
	},
}

/// Unvalidated configuration values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
	/// Shop domain.
	pub domain: Option<String>,
	/// Admin API version; defaults to [`ApiVersion::DEFAULT`].
	pub api_version: Option<String>,
	/// Client ID.
	pub client_id: Option<String>,
	/// Client secret.
	pub client_secret: Option<String>,
	/// Static access token.
	pub access_token: Option<String>,
}
impl ConfigSources {
	/// Reads every value from its environment variable.
	pub fn from_env() -> Self {
		let var = |name| std::env::var(name).ok();

		Self {
			domain: var(ENV_DOMAIN),
			api_version: var(ENV_API_VERSION),
			client_id: var(ENV_CLIENT_ID),
			client_secret: var(ENV_CLIENT_SECRET),
			access_token: var(ENV_ACCESS_TOKEN),
		}
	}

	/// Validates the values and selects the credential mode.
	pub fn resolve(self) -> Result<Config, ConfigError> {
		let credentials =
			(present(self.client_id), present(self.client_secret), present(self.access_token));
		let auth = match credentials {
			(Some(client_id), Some(client_secret), _) => AuthConfig::ClientCredentials {
				client_id: ClientId::new(&client_id).map_err(ConfigError::InvalidClientId)?,
				client_secret: TokenSecret::new(client_secret),
			},
			(_, _, Some(access_token)) =>
				AuthConfig::Static { access_token: TokenSecret::new(access_token) },
			_ => return Err(ConfigError::MissingCredentials),
		};
		let domain = present(self.domain).ok_or(ConfigError::MissingDomain)?;
		let domain = ShopDomain::new(domain.trim()).map_err(ConfigError::InvalidDomain)?;
		let api_version = match present(self.api_version) {
			Some(raw) => ApiVersion::new(raw.trim()).map_err(ConfigError::InvalidApiVersion)?,
			None => ApiVersion::default(),
		};

		Ok(Config { domain, api_version, auth })
	}
}
impl Debug for ConfigSources {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");

		f.debug_struct("ConfigSources")
			.field("domain", &self.domain)
			.field("api_version", &self.api_version)
			.field("client_id", &self.client_id)
			.field("client_secret", &redact(&self.client_secret))
			.field("access_token", &redact(&self.access_token))
			.finish()
	}
}

// `KEY=` in a `.env` file or shell export arrives as `Some("")`.
fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

/// Command-line arguments; each falls back to its environment variable.
#[cfg(feature = "cli")]
#[derive(Clone, Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
	/// Shop domain (store.myshopify.com).
	#[arg(long, env = ENV_DOMAIN)]
	pub domain: Option<String>,
	/// Admin API version.
	#[arg(long, env = ENV_API_VERSION)]
	pub api_version: Option<String>,
	/// Custom app client ID.
	#[arg(long, env = ENV_CLIENT_ID)]
	pub client_id: Option<String>,
	/// Custom app client secret.
	#[arg(long, env = ENV_CLIENT_SECRET, hide_env_values = true)]
	pub client_secret: Option<String>,
	/// Pre-issued Admin API access token (legacy mode).
	#[arg(long, env = ENV_ACCESS_TOKEN, hide_env_values = true)]
	pub access_token: Option<String>,
}
#[cfg(feature = "cli")]
impl Args {
	/// Validates the arguments into a [`Config`].
	pub fn resolve(self) -> Result<Config, ConfigError> {
		ConfigSources::from(self).resolve()
	}
}
#[cfg(feature = "cli")]
impl From<Args> for ConfigSources {
	fn from(args: Args) -> Self {
		Self {
			domain: args.domain,
			api_version: args.api_version,
			client_id: args.client_id,
			client_secret: args.client_secret,
			access_token: args.access_token,
		}
	}
}
