//! Optional observability helpers for renewals and Admin API requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `shopify_token_broker.flow` with the `flow`
//!   and `stage` (call site) fields, plus info/warn events when credentials are renewed or a
//!   renewal fails. Events carry a token fingerprint, never the token itself.
//! - Enable `metrics` to increment [`FLOW_COUNTER`] once per attempt and once per final outcome,
//!   labeled by `flow` and `outcome`.

mod tracing;

pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Credential renewal against the token endpoint.
	Renewal,
	/// Authenticated Admin API request.
	AdminRequest,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Renewal => "renewal",
			FlowKind::AdminRequest => "admin_request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// The caller waited on a renewal started by someone else and reused its result.
	Coalesced,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Coalesced => "coalesced",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Counter bumped by [`record_flow_outcome`] when the `metrics` feature is on.
pub const FLOW_COUNTER: &str = "shopify_token_broker_flow_total";

/// Counts one `outcome` of `kind` on the global recorder; a no-op without `metrics`.
#[cfg_attr(not(feature = "metrics"), allow(unused_variables))]
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}
