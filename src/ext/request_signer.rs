//! Request signing: how an access token is placed on an outbound request.

// crates.io
use ::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError, http::HttpRequest};

/// Header Shopify reads the Admin API access token from.
pub const SHOPIFY_ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Attaches a credential to a request without otherwise changing it.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Returns `request` carrying `token`.
	fn attach_credential(&self, request: HttpRequest, token: &TokenSecret) -> Result<HttpRequest>;
}

/// Sets `X-Shopify-Access-Token: <token>`; the default for the Admin API.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShopifyHeaderSigner;
impl RequestSigner for ShopifyHeaderSigner {
	fn attach_credential(
		&self,
		mut request: HttpRequest,
		token: &TokenSecret,
	) -> Result<HttpRequest> {
		request.headers_mut().insert(
			HeaderName::from_static("x-shopify-access-token"),
			sensitive_value(token.expose())?,
		);

		Ok(request)
	}
}

/// Sets `Authorization: Bearer <token>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerSigner;
impl RequestSigner for BearerSigner {
	fn attach_credential(
		&self,
		mut request: HttpRequest,
		token: &TokenSecret,
	) -> Result<HttpRequest> {
		request
			.headers_mut()
			.insert(AUTHORIZATION, sensitive_value(&format!("Bearer {}", token.expose()))?);

		Ok(request)
	}
}

fn sensitive_value(raw: &str) -> Result<HeaderValue> {
	let mut value = HeaderValue::from_str(raw).map_err(ConfigError::from)?;

	value.set_sensitive(true);

	Ok(value)
}
