//! Credential providers: the capability the Admin client consumes.
//!
//! A provider hands out the access token for the next request. [`RenewingProvider`] caches a
//! client-credentials token and renews it before it goes stale; [`StaticProvider`] returns a
//! fixed token forever. The variant is chosen once, from [`AuthConfig`], by [`from_config`].

pub mod renewing;
pub mod static_token;

pub use renewing::*;
pub use static_token::*;

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	config::AuthConfig,
	endpoints::ShopEndpoints,
	http::HttpTransport,
	oauth::{ShopifyTokenSource, TransportErrorMapper},
	source::CredentialSource,
};

/// Boxed future returned by [`CredentialProvider::credential`].
pub type CredentialFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Which provider variant is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
	/// Client-credentials token with proactive renewal.
	Renewing,
	/// Fixed, pre-issued token.
	Static,
}
impl ProviderKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderKind::Renewing => "renewing",
			ProviderKind::Static => "static",
		}
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Supplies a usable access token on demand.
///
/// The trait is object safe; callers hold it as `Arc<dyn CredentialProvider>` and never branch
/// on the concrete variant.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Returns a token that is valid for the next request.
	fn credential(&self) -> CredentialFuture<'_>;

	/// Scopes granted to the current credential; empty when unknown.
	fn scopes(&self) -> ScopeSet;

	/// Variant tag, for diagnostics.
	fn kind(&self) -> ProviderKind;
}

/// Builds the provider selected by `auth`, wiring a [`ShopifyTokenSource`] over the supplied
/// transport when client credentials are configured.
pub fn from_config<C, M>(
	auth: &AuthConfig,
	endpoints: &ShopEndpoints,
	http_client: Arc<C>,
	mapper: Arc<M>,
) -> Arc<dyn CredentialProvider>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	match auth {
		AuthConfig::ClientCredentials { client_id, client_secret } => {
			let source = ShopifyTokenSource::<C, M>::with_http_client(
				endpoints.token.clone(),
				client_id.clone(),
				client_secret.clone(),
				http_client,
				mapper,
			);
			let source: Arc<dyn CredentialSource> = Arc::new(source);

			Arc::new(RenewingProvider::new(source))
		},
		AuthConfig::Static { access_token } => Arc::new(StaticProvider::new(access_token.clone())),
	}
}
