//! Crate-level error types shared across the credential source, providers, and the Admin client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The token endpoint rejected the client-credentials request.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered, but not with something usable.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// The Admin API returned a GraphQL `errors` array.
	#[error(transparent)]
	GraphQl(#[from] GraphQlErrors),

	/// A mutation payload reported `userErrors`.
	#[error("Failed to {operation}: {}.", .messages.join(", "))]
	UserErrors {
		/// Human-readable operation label (e.g. `create product`).
		operation: String,
		/// Messages reported by the Admin API.
		messages: Vec<String>,
	},
}

/// Rejection returned by the token endpoint, kept verbatim for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("OAuth token request failed: {status} {body}.")]
pub struct AuthenticationError {
	/// HTTP status code returned by the token endpoint.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Header value contains bytes that cannot be sent.
	#[error("Header value is invalid.")]
	InvalidHeader(#[from] ::http::header::InvalidHeaderValue),
	/// Endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// GraphQL request body could not be serialized.
	#[error("GraphQL request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),

	/// Neither client credentials nor a static access token were supplied.
	#[error("No Shopify credentials provided; set a client ID and secret or an access token.")]
	MissingCredentials,
	/// The shop domain was not supplied.
	#[error("Shop domain is required.")]
	MissingDomain,
	/// The shop domain is not a `*.myshopify.com` host.
	#[error("Invalid Shopify domain format (expected: store.myshopify.com).")]
	InvalidDomain(#[source] crate::auth::IdentifierError),
	/// The client ID contains characters that cannot be sent.
	#[error("Invalid client ID.")]
	InvalidClientId(#[source] crate::auth::IdentifierError),
	/// The API version is not `YYYY-MM` or `unstable`.
	#[error("Invalid Admin API version.")]
	InvalidApiVersion(#[source] crate::auth::IdentifierError),
	/// Credential record builder validation failed.
	#[error("Unable to build credential record.")]
	RecordBuild(#[from] crate::auth::CredentialRecordBuilderError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint label (`token endpoint`, `Admin API`).
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete in time.
	#[error("Request timed out while calling {endpoint}.")]
	Timeout {
		/// Endpoint label (`token endpoint`, `Admin API`).
		endpoint: &'static str,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Upstream responses that cannot be used.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// The Admin API answered with a non-success status.
	#[error("Admin API returned HTTP {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// A response body could not be decoded.
	#[error("{endpoint} returned malformed JSON.")]
	Parse {
		/// Endpoint label (`Token endpoint`, `Admin API`).
		endpoint: &'static str,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint returned a non-positive `expires_in`.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// A GraphQL response carried neither `data` nor `errors`.
	#[error("Admin API response contained no data.")]
	MissingData,
}

/// Location in a GraphQL document where an error occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlErrorLocation {
	/// Line number (1-indexed).
	pub line: i64,
	/// Column number (1-indexed).
	pub column: i64,
}

/// A single GraphQL error entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
	/// Error message.
	pub message: String,
	/// Source locations in the document.
	#[serde(default)]
	pub locations: Vec<GraphQlErrorLocation>,
	/// Path to the failing field in the response.
	#[serde(default)]
	pub path: Vec<serde_json::Value>,
}

/// Non-empty GraphQL `errors` array returned by the Admin API.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("GraphQL errors: {}", join_messages(.0))]
pub struct GraphQlErrors(pub Vec<GraphQlError>);
impl GraphQlErrors {
	/// Returns every error message in response order.
	pub fn messages(&self) -> Vec<&str> {
		self.0.iter().map(|e| e.message.as_str()).collect()
	}
}

fn join_messages(errors: &[GraphQlError]) -> String {
	errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}
