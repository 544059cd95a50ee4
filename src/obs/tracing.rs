// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, ScopeSet, ShopDomain},
	obs::FlowKind,
	provider::ProviderKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = ::tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by renewal and request flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: ::tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				::tracing::info_span!("shopify_token_broker.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use ::tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits an info event describing a freshly issued record.
pub fn log_renewed(record: &CredentialRecord) {
	#[cfg(feature = "tracing")]
	{
		let hours = record.lifetime().as_seconds_f64() / 3600.0;

		::tracing::info!(
			expires_in_hours = format_args!("{hours:.1}"),
			scopes = %record.scope,
			token = %record.access_token.fingerprint(),
			"Access token acquired."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = record;
	}
}

/// Emits a debug event before the token endpoint is called.
pub fn log_renewal_started(forced: bool) {
	#[cfg(feature = "tracing")]
	{
		::tracing::debug!(forced, "Fetching new OAuth access token.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = forced;
	}
}

/// Emits a warn event for a renewal failure that is about to propagate.
pub fn log_renewal_failed(err: &Error) {
	#[cfg(feature = "tracing")]
	{
		::tracing::warn!(error = %err, "Access token renewal failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}

/// Emits an info event once an Admin client is ready to serve requests.
pub fn log_connected(domain: &ShopDomain, kind: ProviderKind, scopes: &ScopeSet) {
	#[cfg(feature = "tracing")]
	{
		::tracing::info!(shop = %domain, provider = %kind, scopes = %scopes, "Admin API client ready.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (domain, kind, scopes);
	}
}
