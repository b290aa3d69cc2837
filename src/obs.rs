//! Optional observability for WeChat calls.
//!
//! # Feature Flags
//!
//! - `tracing`: every call runs inside a `wechat_kit.call` span carrying `call` (kind),
//!   `endpoint` (API path) and, once finished, `outcome`. Failures emit a `warn` event with the
//!   error; token resolutions emit a `debug` event naming where the token came from.
//! - `metrics`: `wechat_kit_call_total{call,outcome}`, `wechat_kit_call_duration_seconds{call}`
//!   and `wechat_kit_token_total{source}`.
//!
//! Both layers compile to no-ops when their feature is off.

mod metrics;
mod tracing;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// WeChat call families observed by the SDK.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Access token lookup or refresh.
	AccessToken,
	/// Official account API call.
	Official,
	/// Payment API call.
	Payment,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::AccessToken => "access_token",
			CallKind::Official => "official",
			CallKind::Payment => "payment",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a call ended, keyed by the [`Error`] layer that stopped it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// The call returned a value.
	Success,
	/// The provider answered with an error body.
	Api,
	/// No access token could be obtained.
	Credential,
	/// Network or deadline failure.
	Transport,
	/// The reply could not be decoded.
	Decode,
	/// The request could not be encoded.
	Encoding,
	/// Local configuration was incomplete.
	Config,
	/// The token store failed.
	Storage,
}
impl CallOutcome {
	/// Classifies a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(Error::Api { .. }) => CallOutcome::Api,
			Err(Error::Credential(_)) => CallOutcome::Credential,
			Err(Error::Transport(_)) => CallOutcome::Transport,
			Err(Error::Decode(_)) => CallOutcome::Decode,
			Err(Error::Encoding(_)) => CallOutcome::Encoding,
			Err(Error::Config(_)) => CallOutcome::Config,
			Err(Error::Storage(_)) => CallOutcome::Storage,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Success => "success",
			CallOutcome::Api => "api_error",
			CallOutcome::Credential => "credential_error",
			CallOutcome::Transport => "transport_error",
			CallOutcome::Decode => "decode_error",
			CallOutcome::Encoding => "encoding_error",
			CallOutcome::Config => "config_error",
			CallOutcome::Storage => "storage_error",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Where [`TokenCache`](crate::cache::TokenCache) found the token it handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSource {
	/// Unexpired entry in the token store.
	Store,
	/// Fresh token from the provider's token endpoint.
	Remote,
	/// Token supplied by the caller through `set_token`.
	Manual,
}
impl TokenSource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenSource::Store => "store",
			TokenSource::Remote => "remote",
			TokenSource::Manual => "manual",
		}
	}
}

/// Runs `fut` as one `kind` call against `endpoint`, recording its outcome and latency.
pub async fn observe<T, Fut>(kind: CallKind, endpoint: &str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let started = Instant::now();
	let span = tracing::call_span(kind, endpoint);
	let result = tracing::in_span(&span, fut).await;
	let outcome = CallOutcome::of(&result);

	tracing::finish(&span, outcome, result.as_ref().err());
	metrics::record_call(kind, outcome, started.elapsed());

	result
}

pub(crate) fn token_resolved(source: TokenSource) {
	tracing::token_resolved(source);
	metrics::record_token(source);
}
