//! Cached client-credentials token with proactive, single-flight renewal.
//!
//! The provider keeps at most one [`CredentialRecord`]. A record is handed out while
//! `now < expires_at - refresh_buffer`; after that the next caller renews it. Renewals are
//! serialized by an async guard: callers that queued behind a renewal compare the current record
//! with the one they observed before waiting and reuse the replacement if it is still fresh
//! (or, for lifetimes shorter than the buffer, not yet expired) instead of calling the token
//! endpoint again. A failed renewal leaves the previous record in place and releases the
//! guard, so the next waiter starts a fresh attempt.

// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, RecordStatus, ScopeSet},
	clock::{Clock, SystemClock},
	error::{ConfigError, ResponseError},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{CredentialFuture, CredentialProvider, ProviderKind},
	source::CredentialSource,
};

/// Observable state of a [`RenewingProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenewalState {
	/// No credential has been issued yet.
	Empty,
	/// The current credential is outside the refresh buffer.
	Fresh,
	/// The current credential is inside the refresh buffer or past its expiry.
	Stale,
}

/// Provider that renews a client-credentials token before it expires.
pub struct RenewingProvider {
	source: Arc<dyn CredentialSource>,
	clock: Arc<dyn Clock>,
	refresh_buffer: Duration,
	current: RwLock<Option<Arc<CredentialRecord>>>,
	renewal: AsyncMutex<()>,
}
impl RenewingProvider {
	/// Margin before the declared expiry at which a record stops being handed out.
	pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::minutes(5);

	const KIND: FlowKind = FlowKind::Renewal;

	/// Creates an empty provider over `source`, using the system clock.
	pub fn new(source: Arc<dyn CredentialSource>) -> Self {
		Self {
			source,
			clock: Arc::new(SystemClock),
			refresh_buffer: Self::DEFAULT_REFRESH_BUFFER,
			current: RwLock::new(None),
			renewal: AsyncMutex::new(()),
		}
	}

	/// Replaces the time source.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the refresh buffer; negative values clamp to zero.
	pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Active refresh buffer.
	pub fn refresh_buffer(&self) -> Duration {
		self.refresh_buffer
	}

	/// Snapshot of the current record, if any.
	pub fn current(&self) -> Option<Arc<CredentialRecord>> {
		self.current.read().clone()
	}

	/// State as of the provider's clock.
	pub fn state(&self) -> RenewalState {
		self.state_at(self.clock.now())
	}

	/// State as of `now`.
	pub fn state_at(&self, now: OffsetDateTime) -> RenewalState {
		match self.current.read().as_deref().map(|r| r.status_at(now, self.refresh_buffer)) {
			None => RenewalState::Empty,
			Some(RecordStatus::Fresh) => RenewalState::Fresh,
			Some(RecordStatus::Stale | RecordStatus::Expired) => RenewalState::Stale,
		}
	}

	/// Returns a fresh record, renewing it first when it is absent or stale.
	pub async fn ensure_fresh(&self) -> Result<Arc<CredentialRecord>> {
		let observed = self.current();

		if let Some(record) =
			observed.as_ref().filter(|r| r.is_usable_at(self.clock.now(), self.refresh_buffer))
		{
			return Ok(record.clone());
		}

		let span = FlowSpan::new(Self::KIND, "ensure_fresh");

		span.instrument(async move {
			let _singleflight = self.renewal.lock().await;
			let current = self.current();

			if let Some(record) = current
				.filter(|r| !same_record(&observed, r) && self.serves_waiter(r, self.clock.now()))
			{
				obs::record_flow_outcome(Self::KIND, FlowOutcome::Coalesced);

				return Ok(record);
			}

			self.renew_locked(false).await
		})
		.await
	}

	/// Renews unconditionally, even if the current record is still fresh.
	///
	/// On failure the previous record stays current.
	pub async fn renew(&self) -> Result<Arc<CredentialRecord>> {
		let span = FlowSpan::new(Self::KIND, "renew");

		span.instrument(async move {
			let _singleflight = self.renewal.lock().await;

			self.renew_locked(true).await
		})
		.await
	}

	// A record whose whole lifetime fits inside the buffer is never fresh; sharing it until
	// expiry keeps queued callers from renewing once each.
	fn serves_waiter(&self, record: &CredentialRecord, now: OffsetDateTime) -> bool {
		record.is_usable_at(now, self.refresh_buffer)
			|| (record.lifetime() <= self.refresh_buffer && !record.is_expired_at(now))
	}

	// Callers must hold `self.renewal`.
	async fn renew_locked(&self, forced: bool) -> Result<Arc<CredentialRecord>> {
		let issued_at = self.clock.now();

		obs::record_flow_outcome(Self::KIND, FlowOutcome::Attempt);
		obs::log_renewal_started(forced);

		let result: Result<Arc<CredentialRecord>> = async {
			let issued = self.source.fetch().await?;
			let expires_at = issued_at
				.checked_add(issued.expires_in)
				.ok_or(ResponseError::ExpiresInOutOfRange)?;
			let scope = ScopeSet::parse_delimited(&issued.scope, ScopeSet::DELIMITER);
			let record = CredentialRecord::builder(scope)
				.access_token(issued.access_token)
				.issued_at(issued_at)
				.expires_at(expires_at)
				.build()
				.map_err(ConfigError::from)?;

			Ok(Arc::new(record))
		}
		.await;

		match result {
			Ok(record) => {
				*self.current.write() = Some(record.clone());

				obs::record_flow_outcome(Self::KIND, FlowOutcome::Success);
				obs::log_renewed(&record);

				Ok(record)
			},
			Err(e) => {
				obs::record_flow_outcome(Self::KIND, FlowOutcome::Failure);
				obs::log_renewal_failed(&e);

				Err(e)
			},
		}
	}
}
impl CredentialProvider for RenewingProvider {
	fn credential(&self) -> CredentialFuture<'_> {
		Box::pin(async move { Ok(self.ensure_fresh().await?.access_token.clone()) })
	}

	fn scopes(&self) -> ScopeSet {
		self.current.read().as_ref().map(|r| r.scope.clone()).unwrap_or_default()
	}

	fn kind(&self) -> ProviderKind {
		ProviderKind::Renewing
	}
}
impl Debug for RenewingProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RenewingProvider")
			.field("refresh_buffer", &self.refresh_buffer)
			.field("current", &self.current.read())
			.finish_non_exhaustive()
	}
}

fn same_record(observed: &Option<Arc<CredentialRecord>>, current: &Arc<CredentialRecord>) -> bool {
	observed.as_ref().is_some_and(|o| Arc::ptr_eq(o, current))
}
