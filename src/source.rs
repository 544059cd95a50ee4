//! Credential source contract: the stateless authority a renewing provider calls.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Boxed future returned by [`CredentialSource::fetch`].
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Result<IssuedCredential>> + 'a + Send>>;

/// External authority that exchanges client credentials for a bearer credential.
///
/// Implementations hold no cache and perform no retries; every call reaches the authority.
/// Rejections surface as [`Error::Authentication`](crate::error::Error::Authentication).
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Requests a new credential.
	fn fetch(&self) -> SourceFuture<'_>;
}

/// Raw result of a successful [`CredentialSource::fetch`].
#[derive(Clone, Debug)]
pub struct IssuedCredential {
	/// Bearer token.
	pub access_token: TokenSecret,
	/// Scope string exactly as the authority returned it.
	pub scope: String,
	/// Declared validity, always positive.
	pub expires_in: Duration,
}
impl IssuedCredential {
	/// Creates an issued credential.
	pub fn new(
		access_token: impl Into<TokenSecret>,
		scope: impl Into<String>,
		expires_in: Duration,
	) -> Self {
		Self { access_token: access_token.into(), scope: scope.into(), expires_in }
	}
}
