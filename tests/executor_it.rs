mod common;

// std
use std::time::Instant;
// self
use bearer_client::{
	client::{ApiRequest, CONNECTION_BACKOFF, MAX_RETRIES, RequestBody},
	config::{AuthMode, ClientConfig, ClientConfigError, RefreshFallback},
	error::{ConfigError, Error, TokenEndpoint, TransportError},
	oauth2::http::{Method, StatusCode},
};
use common::*;

const ORDER: &str = r#"{"id":1,"qty":3}"#;

#[tokio::test]
async fn first_call_acquires_token_lazily() {
	let transport = ScriptedHttpClient::new([
		Scripted::Respond(401, "no token"),
		Scripted::Respond(200, "ok"),
	])
	.reject_refresh();
	let client = scripted_client(&transport);
	let response = client
		.execute(Method::GET, "http://fake.test/data", ())
		.await
		.expect("Lazy acquisition should succeed.");
	let requests = transport.requests();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(requests.len(), 2);
	assert_eq!(requests[0].authorization.trim_end(), "bearer");
	assert_eq!(requests[1].authorization, "bearer tok-login-1");
	assert_eq!(transport.refreshes(), 1);
	assert_eq!(transport.logins(), 1);
}

#[tokio::test]
async fn two_unauthorized_then_success_resends_identical_requests() {
	let transport = ScriptedHttpClient::new([
		Scripted::Respond(401, "stale"),
		Scripted::Respond(401, "stale"),
		Scripted::Respond(200, "created"),
	]);
	let client = scripted_client(&transport);

	client.request_token_by_login().await.expect("Login should succeed.");

	let response = client
		.execute(Method::POST, "http://fake.test/orders", ORDER)
		.await
		.expect("Third attempt should succeed.");
	let requests = transport.requests();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.body(), b"created");
	assert_eq!(requests.len(), 3);
	assert_eq!(transport.refreshes(), 2);

	for request in &requests {
		assert_eq!(request.method, Method::POST);
		assert_eq!(request.path, "/orders");
		assert_eq!(request.body, ORDER.as_bytes());
		assert_eq!(request.content_type, "application/json");
	}

	assert_eq!(requests[0].authorization, "bearer tok-login-1");
	assert_eq!(requests[1].authorization, "bearer tok-refresh-1");
	assert_eq!(requests[2].authorization, "bearer tok-refresh-2");
	assert_eq!(client.token().access_token.expose(), "tok-refresh-2");
	assert_eq!(client.metrics.auth_retries(), u64::from(MAX_RETRIES));
}

#[tokio::test]
async fn third_unauthorized_is_returned_without_a_fourth_attempt() {
	let transport = ScriptedHttpClient::new([
		Scripted::Respond(401, "first"),
		Scripted::Respond(401, "second"),
		Scripted::Respond(401, "third"),
	]);
	let client = scripted_client(&transport);
	let response = client
		.execute(Method::GET, "http://fake.test/data", ())
		.await
		.expect("Exhausted 401 is a response, not an error.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(response.body(), b"third");
	assert_eq!(transport.requests().len(), 3);
	assert_eq!(transport.refreshes(), 2);
}

#[tokio::test]
async fn connection_failures_back_off_and_keep_the_token() {
	let transport = ScriptedHttpClient::new([
		Scripted::Refuse,
		Scripted::Refuse,
		Scripted::Respond(200, "ok"),
	]);
	let client = scripted_client(&transport);

	client.request_token_by_login().await.expect("Login should succeed.");

	let generation = client.token_snapshot().generation;
	let started = Instant::now();
	let response = client
		.execute(Method::PUT, "http://fake.test/orders/1", ORDER)
		.await
		.expect("Third attempt should succeed.");

	assert!(started.elapsed() >= CONNECTION_BACKOFF * 2);
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(client.token_snapshot().generation, generation);
	assert_eq!(transport.refreshes(), 0);
	assert_eq!(transport.logins(), 1);
	assert_eq!(client.metrics.connection_retries(), 2);

	for request in transport.requests() {
		assert_eq!(request.authorization, "bearer tok-login-1");
		assert_eq!(request.body, ORDER.as_bytes());
	}
}

#[tokio::test]
async fn third_connection_failure_is_terminal() {
	let transport =
		ScriptedHttpClient::new([Scripted::Refuse, Scripted::Refuse, Scripted::Refuse]);
	let client = scripted_client(&transport);
	let err = client
		.execute(Method::GET, "http://fake.test/data", ())
		.await
		.expect_err("Retries should be exhausted.");

	assert!(err.is_connection_failure());
	assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn timeouts_are_not_retried() {
	let transport = ScriptedHttpClient::new([Scripted::TimeOut]);
	let client = scripted_client(&transport);
	let err = client
		.execute(Method::GET, "http://fake.test/data", ())
		.await
		.expect_err("Timeouts are terminal.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert_eq!(transport.requests().len(), 1);
	assert_eq!(client.metrics.connection_retries(), 0);
}

#[tokio::test]
async fn retry_counters_are_independent() {
	let transport = ScriptedHttpClient::new([
		Scripted::Refuse,
		Scripted::Respond(401, "stale"),
		Scripted::Refuse,
		Scripted::Respond(401, "stale"),
		Scripted::Respond(200, "ok"),
	]);
	let client = scripted_client(&transport);
	let response = client
		.execute_request(ApiRequest::new(Method::POST, "http://fake.test/orders").with_body(ORDER))
		.await
		.expect("Both budgets allow this sequence.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(transport.requests().len(), 5);
	assert_eq!(client.metrics.connection_retries(), 2);
	assert_eq!(client.metrics.auth_retries(), 2);
}

#[tokio::test]
async fn failed_refresh_during_retry_propagates() {
	let transport = ScriptedHttpClient::new([Scripted::Respond(401, "stale")]).reject_refresh();
	let client = scripted_client_with(
		&transport,
		config_builder("http://fake.test").refresh_fallback(RefreshFallback::Never),
	);
	let err = client
		.execute(Method::GET, "http://fake.test/data", RequestBody::empty())
		.await
		.expect_err("Refresh rejection should surface.");

	assert!(matches!(
		err,
		Error::TokenEndpoint { endpoint: TokenEndpoint::Refresh, status: 400, .. }
	));
	assert_eq!(transport.requests().len(), 1);
	assert_eq!(transport.logins(), 0);
}

#[tokio::test]
async fn basic_auth_returns_unauthorized_without_refreshing() {
	let transport = ScriptedHttpClient::new([Scripted::Respond(401, "wrong password")]);
	let client = scripted_client_with(
		&transport,
		ClientConfig::builder().base_url("http://fake.test").basic_auth("alice", "s3cret"),
	);
	let response = client
		.post("/orders", ORDER)
		.await
		.expect("401 is a result outside bearer mode.");
	let requests = transport.requests();

	assert_eq!(response.http_status, 401);
	assert_eq!(response.data, "wrong password");
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].authorization, "Basic YWxpY2U6czNjcmV0");
	assert_eq!(requests[0].body, ORDER.as_bytes());
	assert_eq!(transport.refreshes(), 0);
	assert_eq!(transport.logins(), 0);
	assert_eq!(client.metrics.auth_retries(), 0);
}

#[tokio::test]
async fn anonymous_mode_sends_no_authorization_and_still_retries_connections() {
	let transport =
		ScriptedHttpClient::new([Scripted::Refuse, Scripted::Respond(401, "who are you")]);
	let client = scripted_client_with(
		&transport,
		ClientConfig::builder().base_url("http://fake.test").auth_mode(AuthMode::Anonymous),
	);
	let response = client.get("/data").await.expect("401 is a result outside bearer mode.");
	let requests = transport.requests();

	assert_eq!(response.http_status, 401);
	assert_eq!(requests.len(), 2);
	assert!(requests.iter().all(|request| request.authorization.is_empty()));
	assert_eq!(client.metrics.connection_retries(), 1);
	assert_eq!(transport.refreshes(), 0);
}

#[tokio::test]
async fn token_exchanges_need_configured_endpoints() {
	let transport = ScriptedHttpClient::new([]);
	let client = scripted_client_with(
		&transport,
		ClientConfig::builder().base_url("http://fake.test").auth_mode(AuthMode::Anonymous),
	);
	let err = client.request_token_by_login().await.expect_err("No token endpoint is configured.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::Client(ClientConfigError::MissingTokenEndpoint))
	));
	assert_eq!(transport.logins(), 0);
}

#[tokio::test]
async fn malformed_requests_fail_before_sending() {
	let transport = ScriptedHttpClient::new([]);
	let client = scripted_client(&transport);
	let err = client
		.execute(Method::GET, "not a url", ())
		.await
		.expect_err("Malformed URL should fail.");

	assert!(matches!(err, Error::Config(_)));
	assert!(transport.requests().is_empty());

	let err = ApiRequest::parse("NOT A METHOD", "http://fake.test/data")
		.expect_err("Malformed method should fail.");

	assert!(matches!(err, Error::Config(_)));
}
