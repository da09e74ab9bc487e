// self
use crate::{
	auth::ProviderId,
	obs::{HandlerKind, HandlerOutcome},
};

/// Counter incremented once per handler outcome.
pub const HANDLER_COUNTER: &str = "oauth2_social_handler_total";

/// Counts `outcome` for one provider's login or connect handler.
///
/// Labels: `handler`, `provider`, `outcome`. Compiles to nothing without the `metrics` feature.
pub fn record_handler_outcome(kind: HandlerKind, provider: &ProviderId, outcome: HandlerOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		HANDLER_COUNTER,
		"handler" => kind.as_str(),
		"provider" => provider.to_string(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, provider, outcome);
}
