// self
#[cfg(not(feature = "tracing"))] use crate::_prelude::*;
use crate::{
	error::Error,
	obs::{CallKind, CallOutcome, TokenSource},
};

#[cfg(feature = "tracing")]
pub(super) type CallSpan = tracing::Span;
#[cfg(not(feature = "tracing"))]
#[derive(Clone, Copy, Debug)]
pub(super) struct CallSpan;

pub(super) fn call_span(kind: CallKind, endpoint: &str) -> CallSpan {
	#[cfg(feature = "tracing")]
	{
		tracing::info_span!(
			"wechat_kit.call",
			call = kind.as_str(),
			endpoint,
			outcome = tracing::field::Empty
		)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, endpoint);

		CallSpan
	}
}

#[cfg(feature = "tracing")]
pub(super) async fn in_span<Fut>(span: &CallSpan, fut: Fut) -> Fut::Output
where
	Fut: std::future::Future,
{
	use tracing::Instrument;

	fut.instrument(span.clone()).await
}
#[cfg(not(feature = "tracing"))]
pub(super) async fn in_span<Fut>(_: &CallSpan, fut: Fut) -> Fut::Output
where
	Fut: Future,
{
	fut.await
}

pub(super) fn finish(span: &CallSpan, outcome: CallOutcome, error: Option<&Error>) {
	#[cfg(feature = "tracing")]
	{
		span.record("outcome", outcome.as_str());

		if let Some(error) = error {
			span.in_scope(|| tracing::warn!(error = %error, "WeChat call failed."));
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (span, outcome, error);
	}
}

pub(super) fn token_resolved(source: TokenSource) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(source = source.as_str(), "Access token resolved.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = source;
	}
}
