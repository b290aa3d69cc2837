//! Caller-supplied credential and its cache fingerprint.

// self
use crate::{_prelude::*, auth::Secret};

/// Namespace prepended to fingerprints to form external cache keys.
pub const CACHE_KEY_PREFIX: &str = "wechat_kit.access_token.";

/// Grant type the token endpoint expects for application credentials.
pub const CLIENT_CREDENTIAL_GRANT: &str = "client_credential";

/// Immutable identity used to obtain access tokens.
///
/// The canonical serialization is JSON with fields in declaration order, and the
/// [`fingerprint`](Self::fingerprint) is the lowercase hex MD5 digest of that JSON. Two
/// credentials with the same fields always share one cache entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Grant type forwarded to the token endpoint.
	pub grant_type: String,
	/// Application identifier.
	pub app_id: String,
	/// Application secret; never printed.
	pub secret: Secret,
}
impl Credential {
	/// Creates a credential with an explicit grant type.
	pub fn new(
		grant_type: impl Into<String>,
		app_id: impl Into<String>,
		secret: impl Into<String>,
	) -> Self {
		Self { grant_type: grant_type.into(), app_id: app_id.into(), secret: Secret::new(secret) }
	}

	/// Creates a `client_credential` grant credential.
	pub fn client_credential(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self::new(CLIENT_CREDENTIAL_GRANT, app_id, secret)
	}

	/// Stable fingerprint derived from the canonical JSON serialization.
	pub fn fingerprint(&self) -> String {
		let canonical = canonical_json(self);

		hex::encode(md5::compute(canonical.as_bytes()).0)
	}

	/// External cache key: [`CACHE_KEY_PREFIX`] followed by the fingerprint.
	pub fn cache_key(&self) -> String {
		format!("{CACHE_KEY_PREFIX}{}", self.fingerprint())
	}

	/// Query pairs the token endpoint expects.
	pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
		[
			("grant_type", self.grant_type.as_str()),
			("appid", self.app_id.as_str()),
			("secret", self.secret.expose()),
		]
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("grant_type", &self.grant_type)
			.field("app_id", &self.app_id)
			.field("secret", &"<redacted>")
			.finish()
	}
}

fn canonical_json(credential: &Credential) -> String {
	// Plain string fields cannot fail to serialize.
	serde_json::to_string(credential).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn fingerprint_is_stable_and_field_sensitive() {
		let a = Credential::client_credential("wx-app", "secret");
		let b = Credential::client_credential("wx-app", "secret");
		let c = Credential::client_credential("wx-app", "other-secret");

		assert_eq!(a.fingerprint(), b.fingerprint());
		assert_ne!(a.fingerprint(), c.fingerprint());
		assert_eq!(a.fingerprint().len(), 32);
	}

	#[test]
	fn fingerprint_hashes_canonical_json() {
		let credential = Credential::new("client_credential", "app", "s");
		let expected = hex::encode(
			md5::compute(br#"{"grant_type":"client_credential","app_id":"app","secret":"s"}"#).0,
		);

		assert_eq!(credential.fingerprint(), expected);
	}

	#[test]
	fn cache_key_prefixes_fingerprint() {
		let credential = Credential::client_credential("wx-app", "secret");
		let key = credential.cache_key();

		assert!(key.starts_with(CACHE_KEY_PREFIX));
		assert!(key.ends_with(&credential.fingerprint()));
	}

	#[test]
	fn debug_redacts_secret() {
		let credential = Credential::client_credential("wx-app", "very-secret");

		assert!(!format!("{credential:?}").contains("very-secret"));
	}
}
