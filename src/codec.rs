//! Flat key/value codecs shared by request encoding, response decoding, and signing.
//!
//! The provider's XML dialect is a single `<xml>` root whose children are scalar fields, so
//! [`Params`] maps one-to-one onto it. Nested values are carried as JSON text.

// std
use std::borrow::Cow;
// crates.io
use quick_xml::{Reader, escape, events::Event};
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::DecodeError};

/// Ordered string-keyed map used for payment payloads and decoded responses.
pub type Params = BTreeMap<String, Value>;

/// Renders a JSON value the way the provider expects scalar fields to appear.
///
/// Strings are passed through, `null` becomes empty, and arrays/objects become JSON text.
pub fn value_to_text(value: &Value) -> Cow<'_, str> {
	match value {
		Value::String(s) => Cow::Borrowed(s),
		Value::Null => Cow::Borrowed(""),
		Value::Bool(b) => Cow::Owned(b.to_string()),
		Value::Number(n) => Cow::Owned(n.to_string()),
		other => Cow::Owned(other.to_string()),
	}
}

/// Serializes `params` as `<xml><key>value</key>...</xml>`.
pub fn params_to_xml<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a String, &'a Value)>,
{
	let mut buf = String::from("<xml>");

	for (key, value) in params {
		buf.push('<');
		buf.push_str(key);
		buf.push('>');
		buf.push_str(&escape::escape(value_to_text(value).as_ref()));
		buf.push_str("</");
		buf.push_str(key);
		buf.push('>');
	}

	buf.push_str("</xml>");

	buf
}

/// Parses a flat XML document into [`Params`], one string value per child of the root.
///
/// Text and CDATA sections are both accepted; grandchildren are flattened into their
/// top-level field's text.
pub fn xml_to_params(body: &[u8]) -> Result<Params, DecodeError> {
	let mut reader = Reader::from_reader(body);

	reader.config_mut().trim_text(true);

	let mut params = Params::new();
	let mut depth = 0_usize;
	let mut field: Option<(String, String)> = None;

	loop {
		match reader.read_event().map_err(xml_error)? {
			Event::Start(start) => {
				depth += 1;

				if depth == 2 {
					let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

					field = Some((name, String::new()));
				}
			},
			Event::Empty(empty) if depth == 1 => {
				let name = String::from_utf8_lossy(empty.local_name().as_ref()).into_owned();

				params.insert(name, Value::String(String::new()));
			},
			Event::Text(text) =>
				if let Some((_, value)) = field.as_mut() {
					value.push_str(&text.unescape().map_err(xml_error)?);
				},
			Event::CData(data) =>
				if let Some((_, value)) = field.as_mut() {
					value.push_str(&String::from_utf8_lossy(&data.into_inner()));
				},
			Event::End(_) => {
				if depth == 2 {
					if let Some((name, value)) = field.take() {
						params.insert(name, Value::String(value));
					}
				}

				depth = depth.saturating_sub(1);
			},
			Event::Eof => break,
			_ => {},
		}
	}

	if depth != 0 {
		return Err(DecodeError::Xml { message: "document ended inside an element".into() });
	}

	Ok(params)
}

/// URL-encodes ordered pairs as an `application/x-www-form-urlencoded` body.
pub fn encode_form<I, K, V>(pairs: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in pairs {
		serializer.append_pair(key.as_ref(), value.as_ref());
	}

	serializer.finish()
}

fn xml_error(e: impl Display) -> DecodeError {
	DecodeError::Xml { message: e.to_string() }
}
