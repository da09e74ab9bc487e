//! Optional observability helpers for login/connect handlers.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `oauth2_social.handler` with the `handler` and
//!   `provider` fields, plus debug events for received responses and provider registration.
//! - Enable `metrics` to increment the `oauth2_social_handler_total` counter for every
//!   attempt/denial/success/failure, labeled by `handler`, `provider` and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// OAuth callback handlers observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
	/// Logging in through an existing provider connection.
	Login,
	/// Linking a provider identity to a local account.
	Connect,
}
impl HandlerKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandlerKind::Login => "login",
			HandlerKind::Connect => "connect",
		}
	}
}
impl Display for HandlerKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each handler invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerOutcome {
	/// Entry to a handler.
	Attempt,
	/// The provider denied authorization.
	Denied,
	/// The callback completed.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl HandlerOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandlerOutcome::Attempt => "attempt",
			HandlerOutcome::Denied => "denied",
			HandlerOutcome::Success => "success",
			HandlerOutcome::Failure => "failure",
		}
	}
}
impl Display for HandlerOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
