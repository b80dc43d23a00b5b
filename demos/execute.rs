//! Demonstrates an executor talking to a mock Secure Access API: a throttled endpoint retried
//! until the attempt budget runs out, then a typed decode once the endpoint recovers. Both
//! calls share one token exchange.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use sse_client::{
	api::{ApiScope, RequestDescriptor},
	auth::{Credential, ScopeList},
	executor::{RecordingSleeper, ReqwestExecutor},
	url::Url,
};

#[derive(Debug, serde::Deserialize)]
struct DestinationLists {
	data: Vec<DestinationList>,
}

#[derive(Debug, serde::Deserialize)]
struct DestinationList {
	id: i64,
	name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/v2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let mut busy_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/policies/v2/destinationlists");
			then.status(429).body("{\"message\":\"Too many requests\"}");
		})
		.await;
	let credential = Credential::parse(
		&server.url("/auth/v2/token"),
		"demo-client",
		"super-secret",
		ScopeList::new(["policies.destinationlists:read"])?,
	)?;
	let sleeper = Arc::new(RecordingSleeper::default());
	let executor = ReqwestExecutor::new(credential)?
		.with_api_base(Url::parse(&server.base_url())?)
		.with_sleeper(sleeper.clone());
	let request = RequestDescriptor::get(ApiScope::Policies, "destinationlists");

	// Every attempt of the first call sees 429; the listing is mounted afterwards.
	let first = executor.execute(request.clone()).await;

	busy_mock.delete_async().await;

	let lists_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/policies/v2/destinationlists");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":[{\"id\":7,\"name\":\"Blocked domains\"}]}");
		})
		.await;

	println!("First call (every attempt throttled): {:?}.", first.map(|response| response.status()));

	let lists: DestinationLists = executor
		.execute(request)
		.await?
		.error_for_status("get destination lists")?
		.json("get destination lists")?;

	for list in &lists.data {
		println!("Destination list {}: {}.", list.id, list.name);
	}

	println!("Backoff requested: {:?}.", sleeper.total());
	println!(
		"Token exchanges: {}, attempts: {}, retries: {}.",
		executor.metrics.token_acquisitions(),
		executor.metrics.attempts(),
		executor.metrics.retries()
	);

	token_mock.assert_async().await;
	lists_mock.assert_async().await;

	Ok(())
}
