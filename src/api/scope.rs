//! API scope families and the HTTP methods the executor accepts.

// crates.io
use oauth2::http::Method;
// self
use crate::_prelude::*;

/// Endpoint family a request belongs to; selects the first path segment of the base URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiScope {
	/// Policy objects (destination lists, network/service objects, rules).
	Policies,
	/// Reporting utilities; the only family that carries the region.
	Reports,
	/// Administrative resources (users).
	Admin,
	/// Deployment resources (identities, tunnels, private resources).
	Deployments,
}
impl ApiScope {
	/// Returns the stable path label of the family.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Policies => "policies",
			Self::Reports => "reports",
			Self::Admin => "admin",
			Self::Deployments => "deployments",
		}
	}

	/// Returns `true` when the family's base URI includes the configured region.
	pub const fn is_regional(self) -> bool {
		matches!(self, Self::Reports)
	}
}
impl Display for ApiScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ApiScope {
	type Err = UnknownScope;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"policies" => Ok(Self::Policies),
			"reports" => Ok(Self::Reports),
			"admin" => Ok(Self::Admin),
			"deployments" => Ok(Self::Deployments),
			other => Err(UnknownScope(other.to_owned())),
		}
	}
}

/// Error returned when parsing an unknown [`ApiScope`] label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown API scope: {0}.")]
pub struct UnknownScope(pub String);

/// HTTP methods accepted by the executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl ApiMethod {
	/// Returns the canonical method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}

	/// Returns `true` for state-changing methods, which get a settling delay after success.
	pub const fn is_mutating(self) -> bool {
		!matches!(self, Self::Get)
	}
}
impl From<ApiMethod> for Method {
	fn from(value: ApiMethod) -> Self {
		match value {
			ApiMethod::Get => Method::GET,
			ApiMethod::Post => Method::POST,
			ApiMethod::Put => Method::PUT,
			ApiMethod::Patch => Method::PATCH,
			ApiMethod::Delete => Method::DELETE,
		}
	}
}
impl Display for ApiMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scope_labels_round_trip() {
		for scope in [ApiScope::Policies, ApiScope::Reports, ApiScope::Admin, ApiScope::Deployments]
		{
			assert_eq!(ApiScope::from_str(scope.as_str()), Ok(scope));
		}

		assert!(ApiScope::from_str("billing").is_err());
		assert!(ApiScope::Reports.is_regional());
		assert!(!ApiScope::Policies.is_regional());
	}

	#[test]
	fn only_get_is_read_only() {
		assert!(!ApiMethod::Get.is_mutating());

		for method in [ApiMethod::Post, ApiMethod::Put, ApiMethod::Patch, ApiMethod::Delete] {
			assert!(method.is_mutating(), "{method} should be treated as mutating.");
		}

		assert_eq!(Method::from(ApiMethod::Patch), Method::PATCH);
	}
}
