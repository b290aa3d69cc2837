//! Cached access token values.

// self
use crate::{_prelude::*, auth::Secret};

/// Query parameter name used to attach access tokens to API calls.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Provider-issued bearer token plus the absolute instant it stops being served.
///
/// Values are replaced wholesale on refresh; nothing mutates a token in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Instant after which the cache must not serve this token.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Creates a token expiring at `expires_at`.
	pub fn new(access_token: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { access_token: Secret::new(access_token), expires_at }
	}

	/// Creates a token that expires `ttl` after `now`, or `None` when that instant is out of range.
	pub fn with_ttl(
		access_token: impl Into<String>,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Option<Self> {
		now.checked_add(ttl).map(|expires_at| Self::new(access_token, expires_at))
	}

	/// Returns `true` while `expires_at` is strictly after `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at > instant
	}

	/// Convenience helper that checks validity against the current UTC instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns the `access_token=<value>` query pair.
	pub fn query_pair(&self) -> (String, String) {
		(ACCESS_TOKEN_KEY.into(), self.access_token.expose().into())
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn validity_is_strict_at_expiry() {
		let expires = macros::datetime!(2025-01-01 01:00 UTC);
		let token = CachedToken::new("token", expires);

		assert!(token.is_valid_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert!(!token.is_valid_at(expires));
		assert!(!token.is_valid_at(macros::datetime!(2025-01-01 01:01 UTC)));
	}

	#[test]
	fn with_ttl_adds_relative_lifetime() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::with_ttl("token", now, Duration::seconds(6700))
			.expect("Lifetime should stay in range.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:51:40 UTC));
	}

	#[test]
	fn with_ttl_refuses_unrepresentable_expiry() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(CachedToken::with_ttl("token", now, Duration::seconds(i64::MAX)).is_none());
		assert!(CachedToken::with_ttl("token", now, Duration::MAX).is_none());
	}

	#[test]
	fn serializes_expiry_as_unix_timestamp() {
		let token = CachedToken::new("token", macros::datetime!(2025-01-01 00:00 UTC));
		let json = serde_json::to_value(&token).expect("Cached token should serialize.");

		assert_eq!(json["expires_at"], 1_735_689_600);
		assert_eq!(json["access_token"], "token");
		assert!(!format!("{token:?}").contains("\"token\""));
	}
}
