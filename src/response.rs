//! Raw provider responses and their decode helpers.

// crates.io
use http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	codec::{self, Params},
	error::DecodeError,
	request::header_str,
};

/// Upper bound on buffered response bodies; anything beyond is discarded.
pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

/// How a response body should be decoded into [`Params`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
	/// `Content-Type` mentions `json`.
	Json,
	/// `Content-Type` mentions `xml`, or the body opens an `<xml` element.
	Xml,
	/// Anything else.
	Other,
}

/// Completed response with a bounded body.
#[derive(Clone, Debug)]
pub struct Response {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl Response {
	/// Wraps transport output, truncating the body to [`MAX_RESPONSE_BYTES`].
	pub fn from_http(response: http::Response<Vec<u8>>) -> Self {
		let (parts, mut body) = response.into_parts();

		body.truncate(MAX_RESPONSE_BYTES);

		Self { status: parts.status, headers: parts.headers, body }
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
	pub fn bytes(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response and returns the raw body.
	pub fn into_bytes(self) -> Vec<u8> {
		self.body
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// `Content-Type` header value, if present and valid.
	pub fn content_type(&self) -> Option<&str> {
		header_str(&self.headers, CONTENT_TYPE)
	}

	/// Classifies the body by header first, then by sniffing for an `<xml` root.
	pub fn content_kind(&self) -> ContentKind {
		let content_type = self.content_type().map(str::to_ascii_lowercase);

		match content_type.as_deref() {
			Some(ct) if ct.contains("xml") => ContentKind::Xml,
			Some(ct) if ct.contains("json") => ContentKind::Json,
			_ if contains(&self.body, b"<xml") => ContentKind::Xml,
			_ => ContentKind::Other,
		}
	}

	/// Decodes a JSON or XML body into a flat key/value map.
	pub fn to_map(&self) -> Result<Params, DecodeError> {
		match self.content_kind() {
			ContentKind::Xml => codec::xml_to_params(&self.body),
			ContentKind::Json => match self.json::<Value>()? {
				Value::Object(object) => Ok(object.into_iter().collect()),
				_ => Err(DecodeError::NotAnObject),
			},
			ContentKind::Other => Err(DecodeError::UnrecognizedContentType {
				content_type: self.content_type().map(str::to_owned),
			}),
		}
	}

	/// Decodes a JSON body into `T`, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		Ok(serde_path_to_error::deserialize(&mut deserializer)?)
	}

	/// Returns the response unchanged unless the body reports a provider error.
	///
	/// Official account APIs signal failure with a non-zero `errcode`; payment APIs with
	/// `return_code` or `result_code` set to `FAIL`. Bodies that cannot be decoded into a map
	/// (media downloads, for instance) pass through.
	pub fn check(self) -> Result<Self> {
		let Ok(map) = self.to_map() else {
			return Ok(self);
		};

		if let Some(code) = map.get("errcode").filter(|code| !is_zero(code)) {
			return Err(Error::Api {
				code: codec::value_to_text(code).into_owned(),
				message: text_field(&map, "errmsg"),
			});
		}
		if text_field(&map, "return_code") == "FAIL" {
			return Err(Error::Api {
				code: "FAIL".into(),
				message: text_field(&map, "return_msg"),
			});
		}
		if text_field(&map, "result_code") == "FAIL" {
			return Err(Error::Api {
				code: text_field(&map, "err_code"),
				message: text_field(&map, "err_code_des"),
			});
		}

		Ok(self)
	}
}

fn is_zero(value: &Value) -> bool {
	match value {
		Value::Number(n) => n.as_i64() == Some(0),
		Value::String(s) => s.trim() == "0",
		_ => false,
	}
}

fn text_field(map: &Params, key: &str) -> String {
	map.get(key).map(|v| codec::value_to_text(v).into_owned()).unwrap_or_default()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|window| window == needle)
}
