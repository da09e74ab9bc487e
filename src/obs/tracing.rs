// self
use crate::{_prelude::*, oauth::OAuthResponse, obs::HandlerKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedHandler<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedHandler<F> = F;

/// A span builder used by login/connect handlers.
#[derive(Clone, Debug)]
pub struct HandlerSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl HandlerSpan {
	/// Creates a new span tagged with the handler kind + provider id.
	pub fn new(kind: HandlerKind, provider: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_social.handler", handler = kind.as_str(), provider);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, provider);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedHandler<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event describing the OAuth response a handler received.
///
/// Token-bearing fields are redacted by [`OAuthResponse`]'s `Debug` implementation.
pub fn trace_response(kind: HandlerKind, display_name: &str, response: Option<&OAuthResponse>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			handler = kind.as_str(),
			provider = display_name,
			?response,
			"Received {kind} response from {display_name}."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, display_name, response);
	}
}

/// Emits a debug event once a provider joins the registry.
pub fn trace_registration(provider: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!("Registered social provider: {provider}.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = provider;
	}
}
