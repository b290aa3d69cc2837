//! Request construction: encodings, payloads, and the dispatcher's build step.
//!
//! [`build_request`] resolves an ([`Encoding`], [`Payload`]) pair into an [`EncodedRequest`].
//! The pairing is a closed match, so unsupported combinations surface as
//! [`EncodingError::UnsupportedPayload`] instead of silently producing an empty body.

mod multipart;

pub use multipart::{MEDIA_CONTENT_TYPE, MultipartForm, Upload};

// crates.io
use http::{
	HeaderValue, Method,
	header::{CONTENT_TYPE, HeaderName},
};
// self
use crate::{
	_prelude::*,
	codec::{self, Params},
	error::EncodingError,
};

/// Transport-level request: method, URL, headers, and an owned body.
///
/// Built fresh per call and consumed once by a [`HttpTransport`](crate::transport::HttpTransport).
/// Multipart requests leave the body empty and carry a [`MultipartForm`] extension instead.
pub type EncodedRequest = http::Request<Vec<u8>>;

/// `Content-Type` sent with JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
/// `Content-Type` sent with XML bodies.
pub const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";
/// `Content-Type` sent with form bodies.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Per-call deadline carried in the request extensions and honored by transports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestDeadline(pub StdDuration);

/// Body encodings understood by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
	/// No body.
	None,
	/// `application/json`.
	Json,
	/// `application/xml` with a flat `<xml>` root.
	Xml,
	/// `application/x-www-form-urlencoded`.
	Form,
	/// `multipart/form-data` carrying a file upload.
	Multipart,
}
impl Encoding {
	/// Returns a stable label suitable for errors and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Encoding::None => "none",
			Encoding::Json => "json",
			Encoding::Xml => "xml",
			Encoding::Form => "form",
			Encoding::Multipart => "multipart",
		}
	}
}
impl Display for Encoding {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logical payload handed to [`build_request`].
#[derive(Clone, Debug, Default)]
pub enum Payload {
	/// No payload.
	#[default]
	Empty,
	/// Pre-encoded bytes sent verbatim.
	Raw(Vec<u8>),
	/// Flat key/value map.
	Params(Params),
	/// Arbitrary JSON document.
	Value(Value),
	/// Ordered form pairs.
	Pairs(Vec<(String, String)>),
	/// File upload for multipart bodies.
	Upload(Upload),
}
impl Payload {
	/// Serializes any [`Serialize`] type into a [`Payload::Value`].
	pub fn json<T>(value: &T) -> Result<Self, EncodingError>
	where
		T: ?Sized + Serialize,
	{
		Ok(Self::Value(serde_json::to_value(value)?))
	}

	/// Returns a stable label suitable for errors.
	pub const fn kind(&self) -> &'static str {
		match self {
			Payload::Empty => "empty",
			Payload::Raw(_) => "raw",
			Payload::Params(_) => "params",
			Payload::Value(_) => "value",
			Payload::Pairs(_) => "pairs",
			Payload::Upload(_) => "upload",
		}
	}
}
impl From<Params> for Payload {
	fn from(params: Params) -> Self {
		Self::Params(params)
	}
}
impl From<Value> for Payload {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}
impl From<Upload> for Payload {
	fn from(upload: Upload) -> Self {
		Self::Upload(upload)
	}
}

/// A fully described API call prior to encoding.
#[derive(Clone, Debug)]
pub struct Call {
	/// HTTP method.
	pub method: Method,
	/// Target URL; may already carry a query string.
	pub url: Url,
	/// Query pairs appended to `url` regardless of body encoding.
	pub query: Vec<(String, String)>,
	/// Declared body encoding.
	pub encoding: Encoding,
	/// Body payload.
	pub payload: Payload,
	/// Optional per-call deadline.
	pub deadline: Option<StdDuration>,
}
impl Call {
	/// Creates a call without query parameters or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self {
			method,
			url,
			query: Vec::new(),
			encoding: Encoding::None,
			payload: Payload::Empty,
			deadline: None,
		}
	}

	/// Shorthand for a `GET` call.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` call.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Appends one query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends several query pairs.
	pub fn queries<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Sets the body encoding and payload.
	pub fn body(mut self, encoding: Encoding, payload: impl Into<Payload>) -> Self {
		self.encoding = encoding;
		self.payload = payload.into();

		self
	}

	/// Sets a JSON body.
	pub fn json(self, payload: impl Into<Payload>) -> Self {
		self.body(Encoding::Json, payload)
	}

	/// Sets an XML body.
	pub fn xml(self, payload: impl Into<Payload>) -> Self {
		self.body(Encoding::Xml, payload)
	}

	/// Sets a multipart upload body.
	pub fn upload(self, upload: Upload) -> Self {
		self.body(Encoding::Multipart, upload)
	}

	/// Sets the per-call deadline.
	pub fn deadline(mut self, deadline: StdDuration) -> Self {
		self.deadline = Some(deadline);

		self
	}

	/// Merges the query pairs into the URL and encodes the body.
	pub fn build(self) -> Result<EncodedRequest, EncodingError> {
		let Self { method, mut url, query, encoding, payload, deadline } = self;

		append_query(&mut url, &query);

		let mut request = build_request(method, &url, encoding, payload)?;

		if let Some(deadline) = deadline {
			request.extensions_mut().insert(RequestDeadline(deadline));
		}

		Ok(request)
	}
}

/// Appends `pairs` to the URL's query string, keeping whatever query it already has.
pub fn append_query<K, V>(url: &mut Url, pairs: &[(K, V)])
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	if pairs.is_empty() {
		return;
	}

	url.query_pairs_mut().extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
}

/// Builds a transport-level request for `payload` under the declared `encoding`.
pub fn build_request(
	method: Method,
	url: &Url,
	encoding: Encoding,
	payload: Payload,
) -> Result<EncodedRequest, EncodingError> {
	let builder = http::Request::builder().method(method).uri(url.as_str());
	let request = match encode_body(encoding, payload)? {
		Body::Bytes(None, bytes) => builder.body(bytes)?,
		Body::Bytes(Some(content_type), bytes) =>
			builder.header(CONTENT_TYPE, content_type).body(bytes)?,
		Body::Multipart(form) => builder.extension(form).body(Vec::new())?,
	};

	Ok(request)
}

enum Body {
	Bytes(Option<HeaderValue>, Vec<u8>),
	Multipart(MultipartForm),
}

fn encode_body(encoding: Encoding, payload: Payload) -> Result<Body, EncodingError> {
	let static_type = |value: &'static str| Some(HeaderValue::from_static(value));
	let encoded = match (encoding, payload) {
		(Encoding::None, Payload::Empty) => (None, Vec::new()),
		(Encoding::Json, Payload::Raw(bytes)) => (static_type(CONTENT_TYPE_JSON), bytes),
		(Encoding::Json, Payload::Params(params)) =>
			(static_type(CONTENT_TYPE_JSON), serde_json::to_vec(&params)?),
		(Encoding::Json, Payload::Value(value)) =>
			(static_type(CONTENT_TYPE_JSON), serde_json::to_vec(&value)?),
		(Encoding::Xml, Payload::Raw(bytes)) => (static_type(CONTENT_TYPE_XML), bytes),
		(Encoding::Xml, Payload::Params(params)) =>
			(static_type(CONTENT_TYPE_XML), codec::params_to_xml(&params).into_bytes()),
		(Encoding::Xml, Payload::Value(Value::Object(object))) =>
			(static_type(CONTENT_TYPE_XML), codec::params_to_xml(&object).into_bytes()),
		(Encoding::Xml, Payload::Value(other)) =>
			return Err(EncodingError::XmlShape { kind: value_kind(&other) }),
		(Encoding::Form, Payload::Raw(bytes)) => (static_type(CONTENT_TYPE_FORM), bytes),
		(Encoding::Form, Payload::Params(params)) => (
			static_type(CONTENT_TYPE_FORM),
			codec::encode_form(params.iter().map(|(k, v)| (k, codec::value_to_text(v))))
				.into_bytes(),
		),
		(Encoding::Form, Payload::Pairs(pairs)) =>
			(static_type(CONTENT_TYPE_FORM), codec::encode_form(pairs).into_bytes()),
		(Encoding::Multipart, Payload::Upload(upload)) =>
			return Ok(Body::Multipart(upload.read()?)),
		(encoding, payload) =>
			return Err(EncodingError::UnsupportedPayload {
				encoding: encoding.as_str(),
				payload: payload.kind(),
			}),
	};

	Ok(Body::Bytes(encoded.0, encoded.1))
}

fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Reads the `Content-Type` header of an encoded request.
pub fn content_type(request: &EncodedRequest) -> Option<&str> {
	header_str(request.headers(), CONTENT_TYPE)
}

pub(crate) fn header_str(headers: &http::HeaderMap, name: HeaderName) -> Option<&str> {
	headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn json_payload_sets_content_type() {
		let request = build_request(
			Method::POST,
			&url("https://api.example.com/cgi-bin/menu/create"),
			Encoding::Json,
			json!({"button": []}).into(),
		)
		.expect("JSON payload should encode.");

		assert_eq!(content_type(&request), Some(CONTENT_TYPE_JSON));
		assert_eq!(request.body(), br#"{"button":[]}"#);
		assert_eq!(request.method(), Method::POST);
	}

	#[test]
	fn xml_payload_renders_flat_document() {
		let params = Params::from([("appid".into(), json!("wx1")), ("total_fee".into(), json!(1))]);
		let request = build_request(
			Method::POST,
			&url("https://pay.example.com/pay/micropay"),
			Encoding::Xml,
			params.into(),
		)
		.expect("XML payload should encode.");

		assert_eq!(content_type(&request), Some(CONTENT_TYPE_XML));
		assert_eq!(request.body(), b"<xml><appid>wx1</appid><total_fee>1</total_fee></xml>");
	}

	#[test]
	fn xml_rejects_non_object_values() {
		let err = build_request(
			Method::POST,
			&url("https://pay.example.com/"),
			Encoding::Xml,
			json!([1, 2]).into(),
		)
		.expect_err("Arrays cannot be rendered as flat XML.");

		assert!(matches!(err, EncodingError::XmlShape { kind: "array" }));
	}

	#[test]
	fn form_pairs_keep_caller_order() {
		let request = build_request(
			Method::POST,
			&url("https://api.example.com/form"),
			Encoding::Form,
			Payload::Pairs(vec![("z".into(), "1".into()), ("a".into(), "b c".into())]),
		)
		.expect("Form payload should encode.");

		assert_eq!(content_type(&request), Some(CONTENT_TYPE_FORM));
		assert_eq!(request.body(), b"z=1&a=b+c");
	}

	#[test]
	fn mismatched_payload_is_an_encoding_error() {
		let err = build_request(
			Method::POST,
			&url("https://api.example.com/"),
			Encoding::Form,
			json!({"a": 1}).into(),
		)
		.expect_err("Form encoding should refuse arbitrary JSON values.");

		assert!(matches!(
			err,
			EncodingError::UnsupportedPayload { encoding: "form", payload: "value" }
		));

		let err = build_request(
			Method::GET,
			&url("https://api.example.com/"),
			Encoding::None,
			Payload::Raw(b"x".to_vec()),
		)
		.expect_err("Bodyless requests should refuse payloads.");

		assert!(matches!(err, EncodingError::UnsupportedPayload { encoding: "none", .. }));
	}

	#[test]
	fn empty_payload_has_no_content_type() {
		let request = build_request(
			Method::GET,
			&url("https://api.example.com/cgi-bin/menu/get"),
			Encoding::None,
			Payload::Empty,
		)
		.expect("Bodyless request should build.");

		assert!(content_type(&request).is_none());
		assert!(request.body().is_empty());
	}

	#[test]
	fn query_merge_preserves_existing_query() {
		let mut target = url("https://api.example.com/cgi-bin/material/add_material?type=image");

		append_query(&mut target, &[("access_token", "tok en"), ("x", "1")]);

		assert_eq!(
			target.as_str(),
			"https://api.example.com/cgi-bin/material/add_material?type=image&access_token=tok+en&x=1",
		);

		let mut untouched = url("https://api.example.com/path?a=1");

		append_query::<&str, &str>(&mut untouched, &[]);

		assert_eq!(untouched.as_str(), "https://api.example.com/path?a=1");
	}

	#[test]
	fn call_build_attaches_query_and_deadline() {
		let request = Call::get(url("https://api.example.com/cgi-bin/token"))
			.query("grant_type", "client_credential")
			.query("appid", "wx1")
			.deadline(StdDuration::from_secs(3))
			.build()
			.expect("Call should build.");

		assert_eq!(
			request.uri().to_string(),
			"https://api.example.com/cgi-bin/token?grant_type=client_credential&appid=wx1",
		);
		assert_eq!(
			request.extensions().get::<RequestDeadline>(),
			Some(&RequestDeadline(StdDuration::from_secs(3))),
		);
	}
}
