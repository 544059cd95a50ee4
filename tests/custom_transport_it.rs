// self
use shopify_token_broker::{
	_preludet::*,
	auth::ClientId,
	error::TransportError,
	http::{HttpRequest, HttpTransport, TransportFuture},
	oauth::{Endpoint, ShopifyTokenSource, TransportErrorMapper},
	provider::{CredentialProvider, RenewalState, RenewingProvider},
	source::CredentialSource,
};

#[derive(Debug)]
enum FakeTransportError {
	ConnectionReset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Transport that fails every request after recording its target.
#[derive(Default)]
struct FailingTransport {
	targets: Mutex<Vec<String>>,
}
impl HttpTransport for FailingTransport {
	type TransportError = FakeTransportError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		self.targets.lock().push(request.uri().to_string());

		Box::pin(async { Err(FakeTransportError::ConnectionReset) })
	}
}

#[derive(Default)]
struct RecordingMapper {
	endpoints: Mutex<Vec<Endpoint>>,
}
impl TransportErrorMapper<FakeTransportError> for RecordingMapper {
	fn map_transport_error(&self, endpoint: Endpoint, error: FakeTransportError) -> Error {
		self.endpoints.lock().push(endpoint);

		TransportError::network(endpoint.as_str(), error).into()
	}
}

#[tokio::test]
async fn transport_failures_go_through_the_mapper() {
	let endpoints = test_endpoints("https://proxy.internal");
	let transport = Arc::new(FailingTransport::default());
	let mapper = Arc::new(RecordingMapper::default());
	let source: Arc<dyn CredentialSource> = Arc::new(ShopifyTokenSource::<
		FailingTransport,
		RecordingMapper,
	>::with_http_client(
		endpoints.token.clone(),
		ClientId::new(TEST_CLIENT_ID).expect("Test client ID should be valid."),
		TEST_CLIENT_SECRET,
		transport.clone(),
		mapper.clone(),
	));
	let provider = RenewingProvider::new(source);
	let err = provider.credential().await.expect_err("Transport failure should propagate.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Network { endpoint: "the token endpoint", .. })
	));
	assert_eq!(*mapper.endpoints.lock(), [Endpoint::Token]);
	assert_eq!(*transport.targets.lock(), ["https://proxy.internal/admin/oauth/access_token"]);
	assert_eq!(provider.state(), RenewalState::Empty);
}
