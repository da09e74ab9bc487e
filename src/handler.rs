//! OAuth callback handlers and the request-side collaborators they talk to.
//!
//! A [`LoginHandler`] or [`ConnectHandler`] is invoked with the raw OAuth response once the
//! provider redirects back. A missing response means the provider denied authorization; the
//! handler then flashes a notice and redirects without touching the callback. Otherwise the
//! provider strategy extracts the identity and the configured callback finishes the flow.

pub mod connect;
pub mod login;

pub use connect::*;
pub use login::*;

// self
use crate::{_prelude::*, auth::UserId, config::SocialConfig};

/// Boxed future returned by login/connect callbacks.
pub type CallbackFuture = Pin<Box<dyn Future<Output = Result<Redirect>> + Send>>;

/// Redirect issued at the end of a handler or callback.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Redirect {
	/// Target location (absolute URL or application path).
	pub location: String,
}
impl Redirect {
	/// Redirects to `location`.
	pub fn to(location: impl Into<String>) -> Self {
		Self { location: location.into() }
	}
}
impl Display for Redirect {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.location)
	}
}

/// Severity attached to a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// Completed action.
	Success,
	/// Informational notice.
	Notice,
	/// Failed action.
	Error,
}
impl Severity {
	/// Returns the category label conventionally used by flash sinks.
	pub const fn as_str(self) -> &'static str {
		match self {
			Severity::Success => "success",
			Severity::Notice => "notice",
			Severity::Error => "error",
		}
	}
}

/// Sink that displays transient user-facing messages.
pub trait Notifier: Send + Sync {
	/// Queues `message` for display.
	fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;
impl Notifier for SilentNotifier {
	fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Request-scoped user session owned by the application's authentication layer.
///
/// Implementations resolve the request the call is made from (task-local, request extension,
/// etc.); the crate only holds a shared handle.
pub trait Session: Send + Sync {
	/// Identifier of the authenticated user, or `None` for anonymous requests.
	fn current_user(&self) -> Option<UserId>;

	/// Logs `user_id` into the current session. Returns false when the account may not sign in.
	fn log_in(&self, user_id: &UserId) -> bool;

	/// Removes and returns a value stored under `key`.
	fn pop(&self, key: &str) -> Option<String>;
}

/// Shared state every handler and default flow reads.
#[derive(Clone)]
pub struct HandlerContext {
	/// Global social options.
	pub config: Arc<SocialConfig>,
	/// User-facing notice sink.
	pub notifier: Arc<dyn Notifier>,
}
impl HandlerContext {
	/// Creates a context from the global options and notice sink.
	pub fn new(config: Arc<SocialConfig>, notifier: Arc<dyn Notifier>) -> Self {
		Self { config, notifier }
	}

	/// Emits a notice unless flash messages are disabled.
	pub fn flash(&self, message: impl AsRef<str>, severity: Severity) {
		if self.config.flash_messages {
			self.notifier.notify(message.as_ref(), severity);
		}
	}
}
impl Debug for HandlerContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HandlerContext").field("config", &self.config).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::{AppConfig, FLASH_MESSAGES};

	#[derive(Default)]
	struct Recorder(RwLock<Vec<(String, Severity)>>);
	impl Notifier for Recorder {
		fn notify(&self, message: &str, severity: Severity) {
			self.0.write().push((message.to_owned(), severity));
		}
	}

	fn context(flash: bool) -> (HandlerContext, Arc<Recorder>) {
		let app = AppConfig::from_iter([(FLASH_MESSAGES, Value::Bool(flash))]);
		let config =
			SocialConfig::from_app_config(&app).expect("Flash fixture config should be valid.");
		let recorder = Arc::new(Recorder::default());

		(HandlerContext::new(Arc::new(config), recorder.clone()), recorder)
	}

	#[test]
	fn flash_respects_the_global_switch() {
		let (enabled, enabled_sink) = context(true);
		let (disabled, disabled_sink) = context(false);

		enabled.flash("Connected.", Severity::Success);
		disabled.flash("Connected.", Severity::Success);

		assert_eq!(
			enabled_sink.0.read().as_slice(),
			[("Connected.".to_owned(), Severity::Success)]
		);
		assert!(disabled_sink.0.read().is_empty());
	}

	#[test]
	fn redirect_displays_its_location() {
		assert_eq!(Redirect::to("/profile").to_string(), "/profile");
		assert_eq!(Severity::Notice.as_str(), "notice");
	}
}
