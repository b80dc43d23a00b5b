//! Per-call request descriptors built by resource wrappers.

// self
use crate::{
	_prelude::*,
	api::{ApiMethod, ApiScope},
};

/// One API call: scope family, path, method, and optional JSON body.
///
/// Descriptors are built per call and consumed by [`Executor::execute`].
///
/// [`Executor::execute`]: crate::executor::Executor::execute
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
	/// Endpoint family selecting the base URI.
	pub scope: ApiScope,
	/// Path relative to the scope's base URI, or an absolute URL.
	pub path: String,
	/// HTTP method.
	pub method: ApiMethod,
	/// JSON payload, if any.
	pub body: Option<serde_json::Value>,
}
impl RequestDescriptor {
	/// Creates a descriptor without a body.
	pub fn new(scope: ApiScope, path: impl Into<String>, method: ApiMethod) -> Self {
		Self { scope, path: path.into(), method, body: None }
	}

	/// Shorthand for a `GET` descriptor.
	pub fn get(scope: ApiScope, path: impl Into<String>) -> Self {
		Self::new(scope, path, ApiMethod::Get)
	}

	/// Shorthand for a `DELETE` descriptor.
	pub fn delete(scope: ApiScope, path: impl Into<String>) -> Self {
		Self::new(scope, path, ApiMethod::Delete)
	}

	/// Attaches a JSON body serialized from `payload`.
	pub fn with_json<T>(mut self, payload: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(payload).map_err(Error::Encode)?);

		Ok(self)
	}

	/// Attaches an already-built JSON body.
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes the body for the wire; `None` when the descriptor has no body.
	pub fn encode_body(&self) -> Result<Option<Vec<u8>>> {
		self.body.as_ref().map(|body| serde_json::to_vec(body).map_err(Error::Encode)).transpose()
	}
}
