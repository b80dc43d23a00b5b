//! Raw API responses handed back to resource wrappers.

// crates.io
use oauth2::{
	HttpResponse,
	http::{HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Fully buffered HTTP response returned by [`Executor::execute`].
///
/// The executor never interprets the status; wrappers decide what a 404 or a 409 means for
/// their resource. The body is owned, so it stays readable after the executor inspected it.
///
/// [`Executor::execute`]: crate::executor::Executor::execute
#[derive(Clone, Debug)]
pub struct ApiResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from its parts.
	pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
		Self { status, headers, body }
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw body bytes.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response, returning the body bytes.
	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Body rendered as lossy UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns `true` when the body contains `marker` (byte-wise). An empty marker never matches.
	pub fn body_contains(&self, marker: &str) -> bool {
		let needle = marker.as_bytes();

		!needle.is_empty() && self.body.windows(needle.len()).any(|window| window == needle)
	}

	/// Converts non-2xx responses into [`Error::UnexpectedStatus`] labeled with `operation`.
	pub fn error_for_status(self, operation: &str) -> Result<Self> {
		if self.is_success() {
			return Ok(self);
		}

		Err(Error::UnexpectedStatus {
			operation: operation.to_owned(),
			status: self.status.as_u16(),
			body: self.text(),
		})
	}

	/// Decodes the body as JSON, reporting the failing field path on error.
	pub fn json<T>(&self, operation: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { operation: operation.to_owned(), source })
	}
}
impl From<HttpResponse> for ApiResponse {
	fn from(response: HttpResponse) -> Self {
		let (parts, body) = response.into_parts();

		Self::new(parts.status, parts.headers, body)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Envelope {
		data: Vec<Item>,
	}

	#[derive(Debug, Deserialize)]
	struct Item {
		id: i64,
	}

	fn response(status: u16, body: &str) -> ApiResponse {
		let status = StatusCode::from_u16(status).expect("Status fixture should be valid.");

		ApiResponse::new(status, HeaderMap::new(), body.as_bytes().to_vec())
	}

	#[test]
	fn error_for_status_keeps_body_context() {
		let ok = response(200, "{}").error_for_status("get destination lists");

		assert!(ok.is_ok());

		let err = response(404, "{\"message\":\"missing\"}")
			.error_for_status("get destination list")
			.expect_err("404 should become an error.");

		assert_eq!(
			err.to_string(),
			"Failed to get destination list, status: 404, response: {\"message\":\"missing\"}."
		);
	}

	#[test]
	fn json_reports_field_path() {
		let parsed: Envelope = response(200, "{\"data\":[{\"id\":7}]}")
			.json("list rules")
			.expect("Envelope should decode.");

		assert_eq!(parsed.data[0].id, 7);

		let err = response(200, "{\"data\":[{\"id\":\"seven\"}]}")
			.json::<Envelope>("list rules")
			.expect_err("String ids should fail to decode.");

		match err {
			Error::Decode { operation, source } => {
				assert_eq!(operation, "list rules");
				assert_eq!(source.path().to_string(), "data[0].id");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn body_contains_matches_substrings() {
		let locked = response(409, "{\"message\":\"Ruleset is locked by another request\"}");

		assert!(locked.body_contains("locked"));
		assert!(!locked.body_contains("unlocked"));
		assert!(!locked.body_contains(""));
		assert_eq!(locked.text(), "{\"message\":\"Ruleset is locked by another request\"}");
	}
}
