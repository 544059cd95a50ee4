//! Fixed, pre-issued access token (legacy custom-app mode).

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	provider::{CredentialFuture, CredentialProvider, ProviderKind},
};

/// Provider that always returns the same token.
///
/// It never touches the network or a clock, and reports no scopes because none were granted
/// through this process.
#[derive(Clone, Debug)]
pub struct StaticProvider {
	access_token: TokenSecret,
}
impl StaticProvider {
	/// Wraps a pre-issued token.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into() }
	}
}
impl CredentialProvider for StaticProvider {
	fn credential(&self) -> CredentialFuture<'_> {
		Box::pin(async move { Ok(self.access_token.clone()) })
	}

	fn scopes(&self) -> ScopeSet {
		ScopeSet::default()
	}

	fn kind(&self) -> ProviderKind {
		ProviderKind::Static
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn returns_the_same_token_every_time() {
		let provider = StaticProvider::new("shpat_legacy");

		for _ in 0..3 {
			let token = provider.credential().await.expect("Static credential never fails.");

			assert_eq!(token.expose(), "shpat_legacy");
			assert!(provider.scopes().is_empty());
		}

		assert_eq!(provider.kind(), ProviderKind::Static);
		assert!(!format!("{provider:?}").contains("shpat_legacy"));
	}
}
