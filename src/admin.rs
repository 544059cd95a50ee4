//! Authenticated Shopify Admin GraphQL client.
//!
//! [`AdminClient`] is the only consumer of a [`CredentialProvider`]: every request first asks the
//! provider for a credential, signs the request through a [`RequestSigner`], and only then hands
//! it to the transport. A credential failure therefore never reaches the network.
//!
//! Responses are classified in order: non-success HTTP status, GraphQL `errors`, then missing
//! `data`. Mutation payloads that report `userErrors` can be checked with
//! [`ensure_no_user_errors`].

// crates.io
use ::http::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	endpoints::ShopEndpoints,
	error::{ConfigError, GraphQlError, GraphQlErrors, ResponseError},
	ext::{RequestSigner, ShopifyHeaderSigner},
	http::{HttpRequest, HttpResponse, HttpTransport, ResponseMetadata},
	oauth::{Endpoint, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::CredentialProvider,
};
#[cfg(feature = "reqwest")]
use crate::{
	config::Config,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{self, ProviderKind},
};

/// Document used by [`AdminClient::shop_info`].
pub const SHOP_INFO_QUERY: &str = r#"query GetShopInfo {
  shop {
    id
    name
    email
    myshopifyDomain
    primaryDomain { url host }
    plan { displayName partnerDevelopment shopifyPlus }
    currencyCode
    ianaTimezone
  }
}"#;

#[cfg(feature = "reqwest")]
/// Admin client specialized for the crate's default reqwest transport stack.
pub type ReqwestAdminClient = AdminClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Admin API client bound to one shop and one credential provider.
pub struct AdminClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	endpoints: ShopEndpoints,
	provider: Arc<dyn CredentialProvider>,
	signer: Arc<dyn RequestSigner>,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
}
impl<C, M> AdminClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// Requests are signed with [`ShopifyHeaderSigner`] unless [`with_signer`](Self::with_signer)
	/// says otherwise.
	pub fn with_http_client(
		endpoints: ShopEndpoints,
		provider: Arc<dyn CredentialProvider>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			endpoints,
			provider,
			signer: Arc::new(ShopifyHeaderSigner),
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	/// Replaces the request signer.
	pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
		self.signer = signer;

		self
	}

	/// Endpoints this client talks to.
	pub fn endpoints(&self) -> &ShopEndpoints {
		&self.endpoints
	}

	/// Credential provider backing this client.
	pub fn provider(&self) -> &Arc<dyn CredentialProvider> {
		&self.provider
	}

	/// Attaches a usable credential to `request`.
	///
	/// Fails without side effects when the provider cannot produce a credential.
	pub async fn authorize(&self, request: HttpRequest) -> Result<HttpRequest> {
		let token = self.provider.credential().await?;

		self.signer.attach_credential(request, &token)
	}

	/// Authorizes `request` and forwards it to the transport unchanged otherwise.
	pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
		let request = self.authorize(request).await?;

		self.http_client
			.execute(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(Endpoint::AdminApi, e))
	}

	/// Runs a GraphQL document and decodes its `data` into `T`.
	pub async fn execute<T, V>(&self, document: &str, variables: &V) -> Result<T>
	where
		T: DeserializeOwned,
		V: ?Sized + Serialize + Sync,
	{
		const KIND: FlowKind = FlowKind::AdminRequest;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.build_request(document, variables)?;
				let response = self.send(request).await?;

				parse_graphql_response(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Fetches basic shop metadata; doubles as a credential smoke test.
	pub async fn shop_info(&self) -> Result<ShopInfo> {
		let data: ShopInfoData = self.execute(SHOP_INFO_QUERY, &serde_json::json!({})).await?;

		Ok(data.shop)
	}

	fn build_request<V>(&self, document: &str, variables: &V) -> Result<HttpRequest>
	where
		V: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(&GraphQlRequest { query: document, variables })
			.map_err(ConfigError::RequestBody)?;

		::http::Request::builder()
			.method(Method::POST)
			.uri(self.endpoints.graphql.as_str())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.body(body)
			.map_err(|e| ConfigError::from(e).into())
	}
}
#[cfg(feature = "reqwest")]
impl AdminClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds the reqwest stack for `config` and selects the credential provider.
	///
	/// In client-credentials mode the first token is fetched here, so invalid credentials fail
	/// at startup instead of on the first request.
	pub async fn connect(config: &Config) -> Result<Self> {
		let endpoints = ShopEndpoints::for_shop(config.domain.clone(), config.api_version.clone())?;
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;
		let http_client = Arc::new(ReqwestHttpClient::with_client(client));
		let mapper = Arc::new(ReqwestTransportErrorMapper);
		let provider =
			provider::from_config(&config.auth, &endpoints, http_client.clone(), mapper.clone());

		if provider.kind() == ProviderKind::Renewing {
			provider.credential().await?;
		}

		obs::log_connected(&endpoints.domain, provider.kind(), &provider.scopes());

		Ok(Self::with_http_client(endpoints, provider, http_client, mapper))
	}
}
impl<C, M> Debug for AdminClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminClient")
			.field("endpoints", &self.endpoints)
			.field("provider", &self.provider.kind())
			.finish_non_exhaustive()
	}
}

/// Entry of a mutation payload's `userErrors` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
	/// Input path the error refers to, if any.
	#[serde(default)]
	pub field: Option<Vec<String>>,
	/// Human-readable message.
	pub message: String,
}

/// Fails with [`Error::UserErrors`] when `user_errors` is non-empty.
///
/// `operation` reads as a verb phrase (`create product`), yielding
/// `Failed to create product: Title can't be blank.`.
pub fn ensure_no_user_errors(operation: &str, user_errors: &[UserError]) -> Result<()> {
	if user_errors.is_empty() {
		return Ok(());
	}

	Err(Error::UserErrors {
		operation: operation.to_owned(),
		messages: user_errors.iter().map(|e| e.message.clone()).collect(),
	})
}

/// Shop metadata returned by [`AdminClient::shop_info`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopInfo {
	/// Global ID (`gid://shopify/Shop/..`).
	pub id: String,
	/// Display name.
	pub name: String,
	/// Shop owner email.
	#[serde(default)]
	pub email: Option<String>,
	/// Permanent `*.myshopify.com` domain.
	pub myshopify_domain: String,
	/// Primary storefront domain.
	#[serde(default)]
	pub primary_domain: Option<ShopDomainInfo>,
	/// Subscription plan.
	#[serde(default)]
	pub plan: Option<ShopPlan>,
	/// ISO 4217 store currency.
	pub currency_code: String,
	/// IANA time zone name.
	#[serde(default)]
	pub iana_timezone: Option<String>,
}

/// Domain entry nested in [`ShopInfo`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDomainInfo {
	/// Full URL.
	pub url: String,
	/// Host name.
	pub host: String,
}

/// Plan entry nested in [`ShopInfo`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPlan {
	/// Plan display name.
	pub display_name: String,
	/// Development store flag.
	#[serde(default)]
	pub partner_development: bool,
	/// Shopify Plus flag.
	#[serde(default)]
	pub shopify_plus: bool,
}

#[derive(Deserialize)]
struct ShopInfoData {
	shop: ShopInfo,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V>
where
	V: ?Sized,
{
	query: &'a str,
	variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
	data: Option<T>,
	#[serde(default)]
	errors: Vec<GraphQlError>,
}

fn parse_graphql_response<T>(response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let meta = ResponseMetadata::from_response(&response);

	if !response.status().is_success() {
		return Err(ResponseError::Status {
			status: meta.status,
			body: String::from_utf8_lossy(response.body()).into_owned(),
			retry_after: meta.retry_after,
		}
		.into());
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let parsed: GraphQlResponse<T> = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseError::Parse { endpoint: "Admin API", source })?;

	if !parsed.errors.is_empty() {
		return Err(GraphQlErrors(parsed.errors).into());
	}

	parsed.data.ok_or_else(|| ResponseError::MissingData.into())
}
