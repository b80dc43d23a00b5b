//! Base URI construction for API scopes.

// self
use crate::{_prelude::*, api::ApiScope};

/// Default origin of the Secure Access API.
pub const DEFAULT_API_BASE: &str = "https://api.sse.cisco.com";
/// API version segment appended after the scope.
pub const API_VERSION: &str = "v2";

/// Origin plus optional region used to resolve request paths.
///
/// Relative paths resolve to `<origin>/<scope>/v2/<path>`. The reporting family uses
/// `<scope>.<region>` as its first segment when a region is configured. Absolute URLs bypass
/// resolution entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiBase {
	origin: String,
	region: Option<String>,
}
impl ApiBase {
	/// Creates a base from an origin URL; a trailing `/` is ignored.
	pub fn new(origin: &Url) -> Self {
		Self { origin: origin.as_str().trim_end_matches('/').to_owned(), region: None }
	}

	/// Sets the region used by regional scopes; an empty string clears it.
	pub fn with_region(mut self, region: Option<impl Into<String>>) -> Self {
		self.region = region.map(Into::into).filter(|region: &String| !region.is_empty());

		self
	}

	/// Returns the configured region, if any.
	pub fn region(&self) -> Option<&str> {
		self.region.as_deref()
	}

	/// Returns the base URI of `scope`, without a trailing `/`.
	pub fn base_uri(&self, scope: ApiScope) -> String {
		match (&self.region, scope.is_regional()) {
			(Some(region), true) => format!("{}/{scope}.{region}/{API_VERSION}", self.origin),
			_ => format!("{}/{scope}/{API_VERSION}", self.origin),
		}
	}

	/// Resolves `path` for `scope`.
	///
	/// `http://` and `https://` URLs are returned verbatim. Otherwise one leading `/` is stripped
	/// before joining so the result never contains a doubled separator.
	pub fn resolve(&self, scope: ApiScope, path: &str) -> String {
		if is_absolute(path) {
			return path.to_owned();
		}

		let relative = path.strip_prefix('/').unwrap_or(path);

		format!("{}/{relative}", self.base_uri(scope))
	}
}
impl Default for ApiBase {
	fn default() -> Self {
		Self { origin: DEFAULT_API_BASE.to_owned(), region: None }
	}
}

fn is_absolute(path: &str) -> bool {
	path.starts_with("https://") || path.starts_with("http://")
}
