//! Immutable credential records, freshness helpers, and builders.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, token::secret::TokenSecret},
};

/// Freshness of a record relative to a refresh buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStatus {
	/// `now < expires_at - buffer`; the record may be handed out.
	Fresh,
	/// Inside the refresh buffer but not yet past the declared expiry.
	Stale,
	/// Past the authority-declared expiry.
	Expired,
}

/// Errors produced by [`CredentialRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when the issue instant was not supplied.
	#[error("Issue instant is required.")]
	MissingIssuedAt,
	/// Issued when no expiry instant was configured.
	#[error("Expiry is required.")]
	MissingExpiry,
}

/// Immutable record describing an issued access credential.
///
/// Renewal never edits a record in place; it builds a new one and swaps it in.
#[derive(Clone)]
pub struct CredentialRecord {
	/// Scopes granted alongside the token.
	pub scope: ScopeSet,
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the renewal call started.
	pub issued_at: OffsetDateTime,
	/// Authority-declared expiry (`issued_at + expires_in`).
	pub expires_at: OffsetDateTime,
}
impl CredentialRecord {
	/// Returns a builder for constructing records.
	pub fn builder(scope: ScopeSet) -> CredentialRecordBuilder {
		CredentialRecordBuilder::new(scope)
	}

	/// Computes the freshness at `instant` given a refresh `buffer`.
	pub fn status_at(&self, instant: OffsetDateTime, buffer: Duration) -> RecordStatus {
		if instant >= self.expires_at {
			return RecordStatus::Expired;
		}
		if instant >= self.refresh_at(buffer) {
			return RecordStatus::Stale;
		}

		RecordStatus::Fresh
	}

	/// Returns `true` when `instant < expires_at - buffer`.
	pub fn is_usable_at(&self, instant: OffsetDateTime, buffer: Duration) -> bool {
		matches!(self.status_at(instant, buffer), RecordStatus::Fresh)
	}

	/// Returns `true` if the record has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Instant from which the record should be renewed.
	pub fn refresh_at(&self, buffer: Duration) -> OffsetDateTime {
		self.expires_at - buffer
	}

	/// Declared validity window.
	pub fn lifetime(&self) -> Duration {
		self.expires_at - self.issued_at
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("scope", &self.scope)
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`CredentialRecord`].
#[derive(Clone, Debug)]
pub struct CredentialRecordBuilder {
	scope: ScopeSet,
	access_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
}
impl CredentialRecordBuilder {
	fn new(scope: ScopeSet) -> Self {
		Self { scope, access_token: None, issued_at: None, expires_at: None }
	}

	/// Sets the issued-at instant, normally read from the provider's clock.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.access_token = Some(token.into());

		self
	}

	/// Consumes the builder and produces a [`CredentialRecord`].
	pub fn build(self) -> Result<CredentialRecord, CredentialRecordBuilderError> {
		let access_token =
			self.access_token.ok_or(CredentialRecordBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.ok_or(CredentialRecordBuilderError::MissingIssuedAt)?;
		let expires_at = self.expires_at.ok_or(CredentialRecordBuilderError::MissingExpiry)?;

		Ok(CredentialRecord { scope: self.scope, access_token, issued_at, expires_at })
	}
}
