//! URL construction for a shop's token and Admin GraphQL endpoints.

// self
use crate::{
	_prelude::*,
	auth::{ApiVersion, ShopDomain},
	error::ConfigError,
};

/// Resolved endpoints for one shop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopEndpoints {
	/// Shop the endpoints belong to.
	pub domain: ShopDomain,
	/// Admin API version embedded in [`graphql`](Self::graphql).
	pub api_version: ApiVersion,
	/// Client-credentials token endpoint.
	pub token: Url,
	/// Admin GraphQL endpoint.
	pub graphql: Url,
}
impl ShopEndpoints {
	/// Builds `https://{domain}/admin/oauth/access_token` and
	/// `https://{domain}/admin/api/{version}/graphql.json`.
	pub fn for_shop(domain: ShopDomain, api_version: ApiVersion) -> Result<Self> {
		let token = parse(&format!("https://{domain}/admin/oauth/access_token"))?;
		let graphql = parse(&format!("https://{domain}/admin/api/{api_version}/graphql.json"))?;

		Ok(Self { domain, api_version, token, graphql })
	}

	/// Uses explicit URLs, e.g. a local mock server or a proxy in front of Shopify.
	pub fn with_urls(domain: ShopDomain, api_version: ApiVersion, token: Url, graphql: Url) -> Self {
		Self { domain, api_version, token, graphql }
	}
}

fn parse(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { source }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_embed_domain_and_version() {
		let domain = ShopDomain::new("acme.myshopify.com").expect("Shop fixture should be valid.");
		let version = ApiVersion::new("2025-10").expect("Version fixture should be valid.");
		let endpoints =
			ShopEndpoints::for_shop(domain, version).expect("Endpoints should build for a shop.");

		assert_eq!(endpoints.token.as_str(), "https://acme.myshopify.com/admin/oauth/access_token");
		assert_eq!(
			endpoints.graphql.as_str(),
			"https://acme.myshopify.com/admin/api/2025-10/graphql.json"
		);
	}
}
