//! Transport primitives for executing encoded requests.
//!
//! [`HttpTransport`] is the SDK's only dependency on an HTTP stack. It accepts an
//! [`EncodedRequest`] and resolves to the status, headers, and body of the reply. Implementations
//! honor the [`RequestDeadline`] extension when present, frame a
//! [`MultipartForm`](crate::request::MultipartForm) extension as
//! `multipart/form-data`, and must never buffer more than [`MAX_RESPONSE_BYTES`] of body.

// std
use std::ops::Deref;
// self
#[cfg(feature = "reqwest")] use crate::request::MultipartForm;
use crate::{
	_prelude::*,
	request::{EncodedRequest, RequestDeadline},
	response::MAX_RESPONSE_BYTES,
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<http::Response<Vec<u8>>, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing provider calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by the
/// token cache and every resource client behind an `Arc`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type Error: 'static + Send + Sync + StdError;

	/// Sends `request` once; no retries.
	fn execute(&self, request: EncodedRequest) -> TransportFuture<'_, Self::Error>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests time out after `timeout` unless a call overrides it.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type Error = ReqwestError;

	fn execute(&self, request: EncodedRequest) -> TransportFuture<'_, Self::Error> {
		let client = self.0.clone();

		Box::pin(async move {
			let (mut parts, body) = request.into_parts();
			let deadline = parts.extensions.get::<RequestDeadline>().copied();
			let form = parts.extensions.remove::<MultipartForm>();
			let request = reqwest::Request::try_from(http::Request::from_parts(parts, body))?;
			let mut builder = reqwest::RequestBuilder::from_parts(client, request);

			if let Some(form) = form {
				builder = builder.multipart(form.into_reqwest()?);
			}
			if let Some(RequestDeadline(timeout)) = deadline {
				builder = builder.timeout(timeout);
			}

			let mut response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = read_limited(&mut response, MAX_RESPONSE_BYTES).await?;
			let mut response_new = http::Response::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(feature = "reqwest")]
async fn read_limited(
	response: &mut reqwest::Response,
	limit: usize,
) -> Result<Vec<u8>, ReqwestError> {
	let mut body = Vec::new();

	while let Some(chunk) = response.chunk().await? {
		let remaining = limit - body.len();

		if chunk.len() >= remaining {
			body.extend_from_slice(&chunk[..remaining]);

			break;
		}

		body.extend_from_slice(&chunk);
	}

	Ok(body)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;

	async fn fetch(server: &MockServer, path: &str) -> http::Response<Vec<u8>> {
		let request = http::Request::get(server.url(path))
			.body(Vec::new())
			.expect("Fixture request should build.");

		ReqwestHttpClient::default().execute(request).await.expect("Mock server should answer.")
	}

	#[tokio::test]
	async fn oversized_bodies_are_cut_at_the_limit() {
		let server = MockServer::start_async().await;
		let oversized = server
			.mock_async(|when, then| {
				when.method(GET).path("/oversized");
				then.status(200).body(vec![b'x'; MAX_RESPONSE_BYTES + 4096]);
			})
			.await;
		let exact = server
			.mock_async(|when, then| {
				when.method(GET).path("/exact");
				then.status(200).body(vec![b'y'; MAX_RESPONSE_BYTES]);
			})
			.await;
		let cut = fetch(&server, "/oversized").await;

		assert_eq!(cut.status(), http::StatusCode::OK);
		assert_eq!(cut.body().len(), MAX_RESPONSE_BYTES);
		assert!(cut.body().iter().all(|b| *b == b'x'));

		let whole = fetch(&server, "/exact").await;

		assert_eq!(whole.body().len(), MAX_RESPONSE_BYTES);

		oversized.assert_async().await;
		exact.assert_async().await;
	}

	#[tokio::test]
	async fn small_bodies_and_headers_pass_through() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/small");
				then.status(202).header("content-type", "text/xml").body("<xml></xml>");
			})
			.await;
		let response = fetch(&server, "/small").await;

		assert_eq!(response.status(), http::StatusCode::ACCEPTED);
		assert_eq!(
			response.headers().get("content-type").and_then(|v| v.to_str().ok()),
			Some("text/xml")
		);
		assert_eq!(response.body(), b"<xml></xml>");

		mock.assert_async().await;
	}
}
