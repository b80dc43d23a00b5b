//! Authenticated request executor for the Secure Access policy API. It caches client-credentials
//! tokens and retries the 401/429/409 responses the API uses to signal transient trouble.
//!
//! Resource wrappers describe a call with [`api::RequestDescriptor`] and hand it to
//! [`executor::Executor::execute`]; the executor obtains or refreshes the bearer token,
//! retries the documented transient failures, and returns the raw [`api::ApiResponse`] for
//! the caller to interpret.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credential, ScopeList},
		executor::{RecordingSleeper, ReqwestExecutor},
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Builds a credential pointing at `token_url` with the provided scopes.
	pub fn test_credential(token_url: &str, scopes: &[&str]) -> Credential {
		let token_url = Url::parse(token_url).expect("Failed to parse test token endpoint URL.");
		let scopes =
			ScopeList::new(scopes.iter().copied()).expect("Failed to build test scope list.");

		Credential::new(token_url, "abc", "xyz", scopes)
			.expect("Failed to build test credential.")
	}

	/// Constructs a reqwest-backed executor whose API base points at `api_base` and whose
	/// backoff sleeps are recorded instead of awaited.
	pub fn build_reqwest_test_executor(
		credential: Credential,
		api_base: &str,
	) -> (ReqwestExecutor, Arc<RecordingSleeper>) {
		let sleeper = Arc::new(RecordingSleeper::default());
		let api_base = Url::parse(api_base).expect("Failed to parse test API base URL.");
		let executor = ReqwestExecutor::with_http_client(
			credential,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
		.with_api_base(api_base)
		.with_sleeper(sleeper.clone());

		(executor, sleeper)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
