//! Client-credentials token source for Shopify custom apps.
//!
//! [`ShopifyTokenSource`] posts `grant_type=client_credentials` with the app's client ID and
//! secret to the shop's `/admin/oauth/access_token` endpoint and turns the
//! `{access_token, scope, expires_in}` answer into an [`IssuedCredential`]. Any non-success
//! status becomes an [`AuthenticationError`] carrying the upstream status and body.

// crates.io
use ::http::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, TokenSecret},
	error::{AuthenticationError, ConfigError, ResponseError},
	http::{HttpRequest, HttpTransport, ResponseMetadata},
	source::{CredentialSource, IssuedCredential, SourceFuture},
};
#[cfg(feature = "reqwest")] use crate::{error::TransportError, http::ReqwestHttpClient};

/// Upstream endpoint a transport failure occurred against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	/// The OAuth token endpoint.
	Token,
	/// The Admin GraphQL endpoint.
	AdminApi,
}
impl Endpoint {
	/// Returns a stable, human-readable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "the token endpoint",
			Endpoint::AdminApi => "the Admin API",
		}
	}
}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts a transport error raised while calling `endpoint`.
	fn map_transport_error(&self, endpoint: Endpoint, error: E) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, endpoint: Endpoint, err: ReqwestError) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return TransportError::Timeout { endpoint: endpoint.as_str() }.into();
		}

		TransportError::network(endpoint.as_str(), err).into()
	}
}

#[cfg(feature = "reqwest")]
/// Token source specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenSource = ShopifyTokenSource<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Performs the client-credentials grant against one shop.
#[derive(Clone)]
pub struct ShopifyTokenSource<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	token_url: Url,
	client_id: ClientId,
	client_secret: TokenSecret,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
}
impl<C, M> ShopifyTokenSource<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a source that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		token_url: Url,
		client_id: ClientId,
		client_secret: impl Into<TokenSecret>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			token_url,
			client_id,
			client_secret: client_secret.into(),
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	/// Token endpoint this source calls.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	fn build_request(&self) -> Result<HttpRequest> {
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "client_credentials")
			.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose())
			.finish();

		::http::Request::builder()
			.method(Method::POST)
			.uri(self.token_url.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(body.into_bytes())
			.map_err(|e| ConfigError::from(e).into())
	}
}
#[cfg(feature = "reqwest")]
impl ShopifyTokenSource<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a source backed by a default reqwest client.
	pub fn new(token_url: Url, client_id: ClientId, client_secret: impl Into<TokenSecret>) -> Self {
		Self::with_http_client(
			token_url,
			client_id,
			client_secret,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> CredentialSource for ShopifyTokenSource<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fetch(&self) -> SourceFuture<'_> {
		Box::pin(async move {
			let request = self.build_request()?;
			let response = self.http_client.execute(request).await.map_err(|err| {
				self.transport_mapper.map_transport_error(Endpoint::Token, err)
			})?;
			let meta = ResponseMetadata::from_response(&response);

			if !response.status().is_success() {
				return Err(AuthenticationError {
					status: meta.status,
					body: String::from_utf8_lossy(response.body()).into_owned(),
				}
				.into());
			}

			parse_token_response(response.body())
		})
	}
}
impl<C, M> Debug for ShopifyTokenSource<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ShopifyTokenSource")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	scope: String,
	expires_in: i64,
}

fn parse_token_response(body: &[u8]) -> Result<IssuedCredential> {
	let mut de = serde_json::Deserializer::from_slice(body);
	let parsed: TokenResponse = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseError::Parse { endpoint: "Token endpoint", source })?;

	if parsed.expires_in <= 0 {
		return Err(ResponseError::NonPositiveExpiresIn.into());
	}

	let expires_in = Duration::seconds(parsed.expires_in);

	if expires_in > MAX_EXPIRES_IN {
		return Err(ResponseError::ExpiresInOutOfRange.into());
	}

	Ok(IssuedCredential::new(parsed.access_token, parsed.scope, expires_in))
}

/// Longest validity accepted from the token endpoint.
const MAX_EXPIRES_IN: Duration = Duration::days(3650);

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_maps_fields() {
		let issued = parse_token_response(
			br#"{"access_token":"tok1","scope":"read_products,write_orders","expires_in":3600}"#,
		)
		.expect("Well-formed token response should parse.");

		assert_eq!(issued.access_token.expose(), "tok1");
		assert_eq!(issued.scope, "read_products,write_orders");
		assert_eq!(issued.expires_in, Duration::hours(1));
	}

	#[test]
	fn missing_scope_is_tolerated() {
		let issued = parse_token_response(br#"{"access_token":"tok","expires_in":60}"#)
			.expect("Scope is optional.");

		assert!(issued.scope.is_empty());
	}

	#[test]
	fn malformed_payloads_report_the_field_path() {
		let err = parse_token_response(br#"{"access_token":"tok","expires_in":"soon"}"#)
			.expect_err("String expires_in must be rejected.");

		match err {
			Error::Response(ResponseError::Parse { source, .. }) =>
				assert_eq!(source.path().to_string(), "expires_in"),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn expires_in_bounds_are_enforced() {
		assert!(matches!(
			parse_token_response(br#"{"access_token":"tok","expires_in":0}"#),
			Err(Error::Response(ResponseError::NonPositiveExpiresIn))
		));
		assert!(matches!(
			parse_token_response(br#"{"access_token":"tok","expires_in":-5}"#),
			Err(Error::Response(ResponseError::NonPositiveExpiresIn))
		));
		assert!(matches!(
			parse_token_response(br#"{"access_token":"tok","expires_in":9000000000}"#),
			Err(Error::Response(ResponseError::ExpiresInOutOfRange))
		));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn request_is_a_form_post_with_client_credentials() {
		let source = ShopifyTokenSource::new(
			Url::parse("https://acme.myshopify.com/admin/oauth/access_token")
				.expect("Token URL fixture should parse."),
			ClientId::new("client-1").expect("Client fixture should be valid."),
			"secret &1",
		);
		let request = source.build_request().expect("Token request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://acme.myshopify.com/admin/oauth/access_token");
		assert_eq!(request.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"grant_type=client_credentials&client_id=client-1&client_secret=secret+%261"
		);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn debug_redacts_client_secret() {
		let source = ShopifyTokenSource::new(
			Url::parse("https://acme.myshopify.com/admin/oauth/access_token")
				.expect("Token URL fixture should parse."),
			ClientId::new("client-1").expect("Client fixture should be valid."),
			"shpss_secret",
		);

		assert!(!format!("{source:?}").contains("shpss_secret"));
	}
}
