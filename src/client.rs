//! Dispatcher that executes [`Call`]s over a shared transport.

// self
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;
use crate::{
	_prelude::*,
	error::TransportError,
	request::{Call, EncodedRequest},
	response::Response,
	transport::HttpTransport,
};

/// Client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestApiClient = Client<ReqwestHttpClient>;

/// Executes encoded requests through an [`HttpTransport`] and wraps replies in [`Response`].
///
/// Cloning is cheap; every clone shares the same transport.
pub struct Client<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	timeout: Option<StdDuration>,
}
impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `transport` without a default deadline.
	pub fn new(transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), timeout: None }
	}

	/// Applies `timeout` to every call that does not carry its own deadline.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Shared transport handle.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Default deadline, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout
	}

	/// Sends an already encoded request once.
	pub async fn send(&self, request: EncodedRequest) -> Result<Response, TransportError> {
		let response = self.transport.execute(request).await.map_err(TransportError::network)?;

		Ok(Response::from_http(response))
	}

	/// Encodes `call`, applies the default deadline when it has none, and sends it.
	pub async fn dispatch(&self, mut call: Call) -> Result<Response> {
		if call.deadline.is_none() {
			call.deadline = self.timeout;
		}

		let request = call.build()?;

		Ok(self.send(request).await?)
	}
}
impl<T> Clone for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), timeout: self.timeout }
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("timeout", &self.timeout).finish_non_exhaustive()
	}
}
