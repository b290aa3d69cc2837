//! Payment payload signatures and nonces.
//!
//! The signed string is every non-empty field except `sign`, sorted by key and joined as
//! `k1=v1&k2=v2`, followed by `&key=<merchant key>`. MD5 hashes that string directly;
//! HMAC-SHA256 uses the merchant key as the MAC key. Digests are rendered as uppercase hex.

// crates.io
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	codec::{self, Params},
};

/// Field carrying the signature.
pub const SIGN_FIELD: &str = "sign";
/// Field announcing the signature algorithm.
pub const SIGN_TYPE_FIELD: &str = "sign_type";

const NONCE_LEN: usize = 32;

/// Signature algorithms accepted by the payment APIs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignType {
	/// `MD5` (provider default).
	#[default]
	#[serde(rename = "MD5")]
	Md5,
	/// `HMAC-SHA256`.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
}
impl SignType {
	/// Wire label placed in `sign_type`.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignType::Md5 => "MD5",
			SignType::HmacSha256 => "HMAC-SHA256",
		}
	}
}
impl Display for SignType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Builds the canonical string that gets hashed.
pub fn string_to_sign(params: &Params, key: &str) -> String {
	let mut buf = String::new();

	for (name, value) in params {
		if name == SIGN_FIELD {
			continue;
		}

		let text = codec::value_to_text(value);

		if text.is_empty() {
			continue;
		}

		buf.push_str(name);
		buf.push('=');
		buf.push_str(&text);
		buf.push('&');
	}

	buf.push_str("key=");
	buf.push_str(key);

	buf
}

/// Computes the signature of `params` under `key`.
pub fn generate_signature(params: &Params, key: &str, sign_type: SignType) -> String {
	let plain = string_to_sign(params, key);
	let digest = match sign_type {
		SignType::Md5 => md5::compute(plain.as_bytes()).0.to_vec(),
		SignType::HmacSha256 => {
			// HMAC accepts keys of any length.
			let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key.as_bytes())
				.unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));

			mac.update(plain.as_bytes());
			mac.finalize().into_bytes().to_vec()
		},
	};

	hex::encode_upper(digest)
}

/// Returns `true` when the `sign` field matches the recomputed signature.
///
/// The algorithm comes from `sign_type` when present, otherwise `fallback` applies.
pub fn verify_signature(params: &Params, key: &str, fallback: SignType) -> bool {
	let Some(Value::String(received)) = params.get(SIGN_FIELD) else {
		return false;
	};
	let sign_type = match params.get(SIGN_TYPE_FIELD).and_then(Value::as_str) {
		Some("HMAC-SHA256") => SignType::HmacSha256,
		Some("MD5") => SignType::Md5,
		_ => fallback,
	};

	generate_signature(params, key, sign_type).eq_ignore_ascii_case(received)
}

/// Random 32-character alphanumeric nonce.
pub fn nonce() -> String {
	rand::rng().sample_iter(&Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
