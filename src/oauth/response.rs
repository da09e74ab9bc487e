//! Opaque OAuth response mapping handed to login/connect handlers.

// self
use crate::_prelude::*;

const REDACTED_MARKERS: [&str; 4] = ["token", "secret", "code", "password"];

/// Raw response returned by the OAuth client after the provider redirects back.
///
/// Field layout is provider-specific; integrations read what they need with
/// [`OAuthResponse::lookup`] and [`OAuthResponse::text`].
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OAuthResponse(Map<String, Value>);
impl OAuthResponse {
	/// Wraps a response mapping.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(fields)
	}

	/// Returns the top-level field `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Resolves a dotted path (`user.id`) through nested mappings.
	pub fn lookup(&self, path: &str) -> Option<&Value> {
		let mut segments = path.split('.');
		let mut current = self.0.get(segments.next()?)?;

		for segment in segments {
			current = current.as_object()?.get(segment)?;
		}

		Some(current)
	}

	/// Resolves a dotted path to text; numbers are rendered in decimal, empty strings are absent.
	pub fn text(&self, path: &str) -> Option<String> {
		match self.lookup(path)? {
			Value::String(value) if !value.is_empty() => Some(value.clone()),
			Value::Number(value) => Some(value.to_string()),
			_ => None,
		}
	}

	/// Underlying mapping.
	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}
}
impl From<Map<String, Value>> for OAuthResponse {
	fn from(fields: Map<String, Value>) -> Self {
		Self(fields)
	}
}
impl TryFrom<Value> for OAuthResponse {
	type Error = Value;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(fields) => Ok(Self(fields)),
			other => Err(other),
		}
	}
}
impl Debug for OAuthResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut map = f.debug_map();

		for (key, value) in &self.0 {
			map.entry(key, &Redacted { key, value });
		}

		map.finish()
	}
}

struct Redacted<'a> {
	key: &'a str,
	value: &'a Value,
}
impl Debug for Redacted<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let lowered = self.key.to_ascii_lowercase();

		if REDACTED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
			return f.write_str("<redacted>");
		}

		match self.value {
			Value::Object(fields) => {
				let mut map = f.debug_map();

				for (key, value) in fields {
					map.entry(key, &Redacted { key, value });
				}

				map.finish()
			},
			other => write!(f, "{other}"),
		}
	}
}
