//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
// self
use sse_client::{
	auth::{Credential, ScopeList},
	error::Error,
	executor::{Executor, RecordingSleeper, ReqwestExecutor},
	http::{
		ApiHttpClient, ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot,
		TransportErrorMapper, map_client_error,
	},
	oauth::{
		ReqwestTransportErrorMapper,
		oauth2::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
			http::{
				HeaderName, Response,
				header::{AUTHORIZATION, CONTENT_TYPE},
			},
		},
	},
	url::Url,
};

pub const TOKEN_URL: &str = "https://auth.example/auth/v2/token";
pub const API_BASE: &str = "https://api.example";

pub type ScriptedExecutor = Executor<ScriptedHttpClient, ScriptedMapper>;

/// Builds the `abc`/`xyz` credential used across tests.
pub fn credential(token_url: &str, scopes: &[&str]) -> Credential {
	let scopes = ScopeList::new(scopes.iter().copied()).expect("Scope fixture should be valid.");

	Credential::parse(token_url, "abc", "xyz", scopes).expect("Credential fixture should be valid.")
}

/// Reqwest-backed executor pointed at `api_base` with recorded backoff sleeps.
pub fn reqwest_executor(
	credential: Credential,
	api_base: &str,
) -> (ReqwestExecutor, Arc<RecordingSleeper>) {
	let sleeper = Arc::new(RecordingSleeper::default());
	let api_base = Url::parse(api_base).expect("API base fixture should parse.");
	let executor = ReqwestExecutor::with_http_client(
		credential,
		ReqwestHttpClient::default(),
		Arc::new(ReqwestTransportErrorMapper),
	)
	.with_api_base(api_base)
	.with_sleeper(sleeper.clone());

	(executor, sleeper)
}

/// Executor backed by [`ScriptedHttpClient`] with recorded backoff sleeps.
pub fn scripted_executor(
	client: Arc<ScriptedHttpClient>,
) -> (ScriptedExecutor, Arc<RecordingSleeper>) {
	let sleeper = Arc::new(RecordingSleeper::default());
	let api_base = Url::parse(API_BASE).expect("API base fixture should parse.");
	let executor = ScriptedExecutor::with_http_client(
		credential(TOKEN_URL, &["policies.rules:read"]),
		client,
		Arc::new(ScriptedMapper),
	)
	.with_api_base(api_base)
	.with_sleeper(sleeper.clone());

	(executor, sleeper)
}

/// One scripted outcome of an HTTP exchange.
#[derive(Clone, Debug)]
pub enum Step {
	/// Answer with `status` and `body`.
	Respond { status: u16, body: String },
	/// Fail before any response arrives.
	FailTransport,
	/// Deliver `status`, then fail while reading the body.
	FailBody { status: u16 },
	/// Never complete.
	Hang,
}
impl Step {
	pub fn respond(status: u16, body: &str) -> Self {
		Self::Respond { status, body: body.into() }
	}
}

/// Request observed by [`ScriptedHttpClient`].
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: String,
	pub uri: String,
	pub authorization: Option<String>,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
}

#[derive(Debug)]
pub struct ScriptedTransportError;
impl Display for ScriptedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Scripted transport failure.")
	}
}
impl StdError for ScriptedTransportError {}

#[derive(Default)]
struct Script {
	token_steps: VecDeque<Step>,
	api_steps: VecDeque<Step>,
	token_requests: Vec<Recorded>,
	api_requests: Vec<Recorded>,
}

/// In-memory transport that plays back scripted outcomes.
///
/// Requests to [`TOKEN_URL`] consume token steps and everything else consumes API steps. When
/// a queue runs dry the token side issues `T<n>` (one hour) and the API side answers
/// `200 {"ok":true}`.
#[derive(Default)]
pub struct ScriptedHttpClient {
	script: Arc<Mutex<Script>>,
}
impl ScriptedHttpClient {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn with_api_steps(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
		let client = Self::default();

		client.script.lock().api_steps.extend(steps);

		Arc::new(client)
	}

	pub fn push_token_step(&self, step: Step) {
		self.script.lock().token_steps.push_back(step);
	}

	pub fn token_calls(&self) -> usize {
		self.script.lock().token_requests.len()
	}

	pub fn api_requests(&self) -> Vec<Recorded> {
		self.script.lock().api_requests.clone()
	}

	pub fn api_calls(&self) -> usize {
		self.script.lock().api_requests.len()
	}
}
impl ApiHttpClient for ScriptedHttpClient {
	type Handle = ScriptedHandle;
	type TransportError = ScriptedTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ScriptedHandle { script: self.script.clone(), slot }
	}
}

pub struct ScriptedHandle {
	script: Arc<Mutex<Script>>,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<ScriptedTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let step = self.next_step(&request);
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();
			tokio::task::yield_now().await;

			match step {
				Step::Respond { status, body } => {
					slot.store(ResponseMetadata { status: Some(status) });

					Response::builder()
						.status(status)
						.header("content-type", "application/json")
						.body(body.into_bytes())
						.map_err(|err| HttpClientError::Other(err.to_string()))
				},
				Step::FailTransport => Err(HttpClientError::Other("connection reset".into())),
				Step::FailBody { status } => {
					slot.store(ResponseMetadata { status: Some(status) });

					Err(HttpClientError::Other("body stream closed".into()))
				},
				Step::Hang => std::future::pending().await,
			}
		})
	}
}
impl ScriptedHandle {
	fn next_step(&self, request: &HttpRequest) -> Step {
		let header = |name: HeaderName| {
			request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
		};
		let recorded = Recorded {
			method: request.method().to_string(),
			uri: request.uri().to_string(),
			authorization: header(AUTHORIZATION),
			content_type: header(CONTENT_TYPE),
			body: request.body().clone(),
		};
		let mut script = self.script.lock();

		if recorded.uri == TOKEN_URL {
			script.token_requests.push(recorded);

			let issued = script.token_requests.len();

			script.token_steps.pop_front().unwrap_or_else(|| {
				Step::respond(
					200,
					&format!(
						"{{\"access_token\":\"T{issued}\",\"token_type\":\"Bearer\",\"expires_in\":3600}}"
					),
				)
			})
		} else {
			script.api_requests.push(recorded);
			script.api_steps.pop_front().unwrap_or_else(|| Step::respond(200, "{\"ok\":true}"))
		}
	}
}

/// Mapper for [`ScriptedTransportError`] using the crate's shared classification.
pub struct ScriptedMapper;
impl TransportErrorMapper<ScriptedTransportError> for ScriptedMapper {
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<ScriptedTransportError>,
	) -> Error {
		map_client_error(metadata, error)
	}
}
