// crates.io
use httpmock::prelude::*;
use time::macros;
// self
use shopify_token_broker::{
	_preludet::*,
	error::{AuthenticationError, ResponseError},
	provider::{CredentialProvider, RenewalState},
};

const TOKEN_PATH: &str = "/admin/oauth/access_token";
const START: OffsetDateTime = macros::datetime!(2026-01-01 09:00 UTC);

#[tokio::test]
async fn renewal_posts_client_credentials_and_caches_the_token() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, _clock) = build_test_renewing_provider(&endpoints, START);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", TEST_CLIENT_ID)
				.form_urlencoded_tuple("client_secret", TEST_CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"tok1\",\"scope\":\"read_products, write_orders\",\"expires_in\":86399}",
			);
		})
		.await;
	let first = provider.credential().await.expect("Initial renewal should succeed.");
	let second = provider.credential().await.expect("Cached credential should be reused.");

	assert_eq!(first.expose(), "tok1");
	assert_eq!(second.expose(), "tok1");

	mock.assert_calls_async(1).await;

	let scopes = provider.scopes();

	assert_eq!(scopes.len(), 2);
	assert!(scopes.contains("read_products"));
	assert!(scopes.contains("write_orders"));
	assert_eq!(provider.state(), RenewalState::Fresh);
}

#[tokio::test]
async fn concurrent_callers_trigger_a_single_token_request() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, _clock) = build_test_renewing_provider(&endpoints, START);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(200))
				.body("{\"access_token\":\"shared\",\"scope\":\"read_orders\",\"expires_in\":3600}");
		})
		.await;
	let (first, second, third) =
		tokio::join!(provider.credential(), provider.credential(), provider.credential());

	for token in [first, second, third] {
		assert_eq!(token.expect("Every caller should succeed.").expose(), "shared");
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_credentials_surface_status_and_body() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, _clock) = build_test_renewing_provider(&endpoints, START);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let err = provider.credential().await.expect_err("Rejection should surface to the caller.");

	match &err {
		Error::Authentication(AuthenticationError { status, body }) => {
			assert_eq!(*status, 401);
			assert_eq!(body, "{\"error\":\"invalid_client\"}");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(err.to_string().starts_with("OAuth token request failed: 401"));
	assert_eq!(provider.state(), RenewalState::Empty);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn malformed_token_responses_report_the_missing_field() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, _clock) = build_test_renewing_provider(&endpoints, START);

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok\"}");
		})
		.await;

	let err = provider.credential().await.expect_err("Missing expires_in should fail.");

	match err {
		Error::Response(ResponseError::Parse { source, .. }) =>
			assert!(source.to_string().contains("expires_in")),
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn token_is_replaced_once_the_refresh_buffer_is_entered() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, clock) = build_test_renewing_provider(&endpoints, START);
	let first_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok1\",\"scope\":\"read_products\",\"expires_in\":3600}");
		})
		.await;

	assert_eq!(provider.credential().await.expect("Initial renewal.").expose(), "tok1");

	clock.advance(Duration::seconds(3600 - 301));

	assert_eq!(provider.credential().await.expect("Still fresh.").expose(), "tok1");

	first_mock.assert_calls_async(1).await;
	first_mock.delete_async().await;

	let second_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok2\",\"scope\":\"read_products\",\"expires_in\":3600}");
		})
		.await;

	clock.advance(Duration::seconds(2));

	assert_eq!(provider.credential().await.expect("Stale token renews.").expose(), "tok2");
	assert_eq!(provider.credential().await.expect("New token is cached.").expose(), "tok2");

	second_mock.assert_calls_async(1).await;

	let record = provider.current().expect("A record should be current.");

	assert_eq!(record.issued_at, START + Duration::seconds(3301));
	assert_eq!(record.expires_at, START + Duration::seconds(3301 + 3600));
}

#[tokio::test]
async fn failed_renewal_never_hands_out_the_stale_token() {
	let server = MockServer::start_async().await;
	let endpoints = test_endpoints(&server.base_url());
	let (provider, clock) = build_test_renewing_provider(&endpoints, START);
	let ok_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok1\",\"scope\":\"\",\"expires_in\":600}");
		})
		.await;

	provider.credential().await.expect("Initial renewal.");
	ok_mock.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(503).body("upstream unavailable");
		})
		.await;
	clock.advance(Duration::minutes(6));

	assert!(matches!(
		provider.credential().await,
		Err(Error::Authentication(AuthenticationError { status: 503, .. }))
	));
	assert_eq!(
		provider.current().expect("Previous record is retained.").access_token.expose(),
		"tok1"
	);
	assert_eq!(provider.state(), RenewalState::Stale);
}
