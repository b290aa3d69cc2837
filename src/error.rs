//! SDK-level error types shared across the cache, dispatcher, and resource clients.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Payload could not be encoded for the declared encoding.
	#[error(transparent)]
	Encoding(#[from] EncodingError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body does not parse per its declared content type.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Access token could not be obtained.
	#[error(transparent)]
	Credential(#[from] CredentialError),

	/// Provider answered with an error body (`errcode` or `return_code=FAIL`).
	#[error("Provider returned error {code}: {message}.")]
	Api {
		/// Provider error code.
		code: String,
		/// Provider error message.
		message: String,
	},
}

/// Configuration and validation failures raised while assembling clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required field was left empty.
	#[error("Configuration field `{field}` is required.")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// A host or endpoint cannot be parsed or joined.
	#[error("Configuration field `{field}` holds an invalid URL.")]
	InvalidUrl {
		/// Field name.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Host uses a scheme other than http or https.
	#[error("Configuration field `{field}` must use http or https.")]
	UnsupportedScheme {
		/// Field name.
		field: &'static str,
	},
	/// Token safety margin cannot be negative.
	#[error("The token safety margin must not be negative.")]
	NegativeSafetyMargin,
	/// A zero deadline would fail every call immediately.
	#[error("The call timeout must be at least one millisecond.")]
	ZeroTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Payload rejected while building an [`EncodedRequest`](crate::request::EncodedRequest).
#[derive(Debug, ThisError)]
pub enum EncodingError {
	/// Declared encoding does not accept the supplied payload shape.
	#[error("The {encoding} encoding does not accept a {payload} payload.")]
	UnsupportedPayload {
		/// Encoding label.
		encoding: &'static str,
		/// Payload label.
		payload: &'static str,
	},
	/// JSON serialization failed.
	#[error("Payload could not be serialized as JSON.")]
	Json(#[from] serde_json::Error),
	/// XML payloads must be flat objects.
	#[error("XML payloads must be JSON objects, got {kind}.")]
	XmlShape {
		/// Kind of the rejected value.
		kind: &'static str,
	},
	/// Upload source could not be read.
	#[error("Upload source {} could not be read.", path.display())]
	Upload {
		/// File path supplied by the caller.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Media type cannot go through the generic material upload.
	#[error("Media type {media_type} cannot be uploaded as generic material.")]
	UnsupportedMediaType {
		/// Rejected media type label.
		media_type: &'static str,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	Request(#[from] http::Error),
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response bodies that do not parse per their declared content type.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// JSON body could not be decoded into the requested shape.
	#[error("Response body is not valid JSON for the requested shape.")]
	Json(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// XML body is malformed.
	#[error("Response body is not valid XML: {message}.")]
	Xml {
		/// Parser message.
		message: String,
	},
	/// JSON body parsed but is not an object.
	#[error("Response body is JSON but not an object.")]
	NotAnObject,
	/// Content type is neither JSON nor XML.
	#[error("Response content type {content_type:?} cannot be decoded into a map.")]
	UnrecognizedContentType {
		/// Content-Type header value, when present.
		content_type: Option<String>,
	},
}

/// Failures while obtaining an access token from the provider.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Token endpoint responded with an unparseable body.
	#[error("Token endpoint returned a malformed body.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: DecodeError,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint rejected the credential.
	#[error("Token endpoint rejected the credential with {code}: {message}.")]
	Rejected {
		/// Provider error code.
		code: i64,
		/// Provider error message.
		message: String,
	},
	/// Token endpoint response omitted `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token lifetime pushes the expiry past the representable range.
	#[error("Token lifetime of {ttl_secs} seconds is out of range.")]
	LifetimeOutOfRange {
		/// Lifetime that was requested, in seconds.
		ttl_secs: i64,
	},
}
