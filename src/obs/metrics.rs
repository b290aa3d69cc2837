// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{CallKind, CallOutcome, TokenSource};

pub(super) fn record_call(kind: CallKind, outcome: CallOutcome, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"wechat_kit_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
		metrics::histogram!("wechat_kit_call_duration_seconds", "call" => kind.as_str())
			.record(elapsed.as_secs_f64());
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, elapsed);
	}
}

pub(super) fn record_token(source: TokenSource) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("wechat_kit_token_total", "source" => source.as_str()).increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = source;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_harmless() {
		record_call(CallKind::Payment, CallOutcome::Transport, StdDuration::from_millis(12));
		record_token(TokenSource::Remote);
	}
}
