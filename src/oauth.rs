//! Client-credentials token exchange against the Secure Access token endpoint.
//!
//! The exchange is built by hand rather than through `oauth2`'s request builders because the
//! endpoint expects the client identity twice (HTTP Basic *and* form fields) and callers need
//! the raw status and body of rejected requests.

pub use oauth2;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Credential, TokenResponse},
	error::{ConfigError, TokenError},
	http::{ApiHttpClient, ResponseMetadata, ResponseMetadataSlot, TransportErrorMapper},
};

/// Content type of the token request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() && meta.is_none() =>
				ConfigError::from(*inner).into(),
			other => crate::http::map_client_error(meta, other),
		}
	}
}

/// Renders the form body of a `client_credentials` request.
///
/// Field order is fixed: `grant_type`, `client_id`, `client_secret`, then `scope` when any
/// scopes are configured.
pub fn client_credentials_form(credential: &Credential) -> String {
	let mut form = FormSerializer::new(String::new());

	form.append_pair("grant_type", "client_credentials")
		.append_pair("client_id", &credential.client_id)
		.append_pair("client_secret", credential.client_secret.expose());

	if let Some(scope) = credential.scopes.to_form_value() {
		form.append_pair("scope", &scope);
	}

	form.finish()
}

/// Renders the HTTP Basic `Authorization` header for the credential.
pub fn basic_authorization(credential: &Credential) -> String {
	let raw = format!("{}:{}", credential.client_id, credential.client_secret.expose());

	format!("Basic {}", STANDARD.encode(raw))
}

/// Builds the token endpoint request for `credential`.
pub fn build_token_request(credential: &Credential) -> Result<HttpRequest> {
	let request = oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(credential.token_url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(AUTHORIZATION, basic_authorization(credential))
		.body(client_credentials_form(credential).into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Performs one `client_credentials` exchange and stamps the result with the current clock.
///
/// Failures are never retried here; every error is a [`TokenError`] or a configuration error.
pub async fn request_token<C, M>(
	credential: &Credential,
	http_client: &C,
	mapper: &M,
) -> Result<CachedToken>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let request = build_token_request(credential)?;
	let meta = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(meta.clone());
	let response = handle.call(request).await.map_err(|err| {
		match mapper.map_transport_error(meta.take().as_ref(), err) {
			Error::Transport(source) => TokenError::Transport(source).into(),
			other => other,
		}
	})?;
	let status = response.status();

	if status != StatusCode::OK {
		return Err(TokenError::Rejected {
			status: status.as_u16(),
			body: String::from_utf8_lossy(response.body()).into_owned(),
		}
		.into());
	}

	let mut deserializer = serde_json::Deserializer::from_slice(response.body());
	let parsed: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TokenError::Parse { status: status.as_u16(), source })?;

	Ok(CachedToken::from_response(parsed, OffsetDateTime::now_utc()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::ScopeList;

	fn credential(scopes: &[&str]) -> Credential {
		let scopes = ScopeList::new(scopes.iter().copied()).expect("Scope fixture should be valid.");

		Credential::parse("https://auth.example/token", "abc", "xyz", scopes)
			.expect("Credential fixture should be valid.")
	}

	#[test]
	fn form_includes_scope_only_when_configured() {
		assert_eq!(
			client_credentials_form(&credential(&["read", "write"])),
			"grant_type=client_credentials&client_id=abc&client_secret=xyz&scope=read+write"
		);
		assert_eq!(
			client_credentials_form(&credential(&[])),
			"grant_type=client_credentials&client_id=abc&client_secret=xyz"
		);
	}

	#[test]
	fn token_request_carries_basic_auth() {
		let request =
			build_token_request(&credential(&["read"])).expect("Token request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://auth.example/token");
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
		assert_eq!(request.headers()[AUTHORIZATION], "Basic YWJjOnh5eg==");
	}
}
