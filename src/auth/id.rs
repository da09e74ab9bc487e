//! Identifiers for providers, local users, and provider-side accounts.
//!
//! Provider ids are registry keys and callback route segments at once, so they are folded to
//! lowercase and limited to `[a-z0-9._-]`. User and provider-user ids are opaque: any text
//! without whitespace or control characters is kept exactly as given.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Construction rules for one identifier kind.
struct Rules {
	kind: &'static str,
	max_chars: usize,
	fold_case: bool,
	accepts: fn(char) -> bool,
}
impl Rules {
	fn apply(&self, raw: &str) -> Result<String, IdentifierError> {
		let kind = self.kind;

		if raw.is_empty() {
			return Err(IdentifierError::Empty { kind });
		}
		if raw.chars().count() > self.max_chars {
			return Err(IdentifierError::TooLong { kind, max: self.max_chars });
		}

		let value = if self.fold_case { raw.to_ascii_lowercase() } else { raw.to_owned() };

		match value.chars().find(|&ch| !(self.accepts)(ch)) {
			Some(ch) => Err(IdentifierError::InvalidCharacter { kind, ch }),
			None => Ok(value),
		}
	}
}

const PROVIDER_RULES: Rules =
	Rules { kind: "Provider", max_chars: 64, fold_case: true, accepts: is_route_char };
const USER_RULES: Rules =
	Rules { kind: "User", max_chars: 128, fold_case: false, accepts: is_opaque_char };
const PROVIDER_USER_RULES: Rules =
	Rules { kind: "ProviderUser", max_chars: 256, fold_case: false, accepts: is_opaque_char };

fn is_route_char(ch: char) -> bool {
	ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-')
}

fn is_opaque_char(ch: char) -> bool {
	!ch.is_whitespace() && !ch.is_control()
}

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident => $rules:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and builds the identifier.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				$rules.apply(value.as_ref()).map(Self)
			}

			/// Identifier text.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
	};
}

identifier! {
	/// Registry key of an OAuth provider (e.g. `twitter`); always lowercase.
	ProviderId => PROVIDER_RULES
}
identifier! {
	/// Identifier of a local application user.
	UserId => USER_RULES
}
identifier! {
	/// Account identifier assigned by a provider, kept verbatim.
	ProviderUserId => PROVIDER_USER_RULES
}

/// Error returned when an identifier is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Identifier kind.
		kind: &'static str,
	},
	/// The identifier holds a character its kind does not allow.
	#[error("{kind} identifier contains the invalid character {ch:?}.")]
	InvalidCharacter {
		/// Identifier kind.
		kind: &'static str,
		/// First rejected character.
		ch: char,
	},
	/// The identifier is longer than its kind allows.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Identifier kind.
		kind: &'static str,
		/// Maximum character count.
		max: usize,
	},
}
