//! Executor-level error types shared across configuration, token acquisition, and API calls.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Only [`Error::Transport`] is retried by the executor; every other variant propagates to the
/// caller immediately.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The token endpoint could not issue a bearer token.
	#[error("Failed to obtain token.")]
	Token(
		#[from]
		#[source]
		TokenError,
	),
	/// Transport failure (DNS, TCP, TLS, timeout) before a response arrived.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response headers arrived but the body could not be read.
	#[error("Failed to read the body of an HTTP {status} response.")]
	ReadBody {
		/// HTTP status code of the unreadable response.
		status: u16,
		/// Underlying read failure.
		#[source]
		source: BoxError,
	},
	/// Every attempt failed at the transport level.
	#[error("Could not complete API request: all {attempts} retry attempts failed.")]
	RetriesExhausted {
		/// Number of attempts performed.
		attempts: u32,
		/// Transport failure observed on the final attempt.
		#[source]
		source: TransportError,
	},
	/// Request payload could not be serialized to JSON.
	#[error("Failed to marshal request data.")]
	Encode(#[source] serde_json::Error),
	/// Response body could not be decoded into the caller's shape.
	#[error("Failed to decode response for {operation}.")]
	Decode {
		/// Caller-supplied operation label.
		operation: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The API answered with a status the caller did not expect.
	#[error("Failed to {operation}, status: {status}, response: {body}.")]
	UnexpectedStatus {
		/// Caller-supplied operation label.
		operation: String,
		/// HTTP status code.
		status: u16,
		/// Response body rendered as lossy UTF-8.
		body: String,
	},
}
impl Error {
	/// Returns `true` when the executor may retry the attempt that produced this error.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
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
	HttpRequest(#[from] oauth2::http::Error),
	/// A required credential field is empty.
	#[error("Missing configuration: {field} must be set.")]
	MissingField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// A configured URL cannot be parsed.
	#[error("Configured {field} is not a valid URL.")]
	InvalidUrl {
		/// Name of the offending field.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request timeout must be positive.
	#[error("The request timeout must be positive.")]
	NonPositiveTimeout,
	/// Configured scopes cannot be used.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Configuration sources could not be merged or extracted.
	#[error("Failed to load configuration.")]
	Load(
		#[from]
		#[source]
		Box<figment::Error>,
	),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<figment::Error> for ConfigError {
	fn from(e: figment::Error) -> Self {
		Self::Load(Box::new(e))
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures; terminal for the `execute` call that triggered them.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token endpoint answered with a non-200 status.
	#[error("Failed to obtain token, status: {status}, response: {body}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Response body rendered as lossy UTF-8.
		body: String,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Failed to decode token response.")]
	Parse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint could not be reached.
	#[error("Failed to request token.")]
	Transport(#[source] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Request failed: network error.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("Request failed: I/O error.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a structured error.
	#[error("Request failed: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
