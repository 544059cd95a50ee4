//! Strongly typed identifiers for shops, API versions, and OAuth clients.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
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
	};
}

const IDENTIFIER_MAX_LEN: usize = 255;
const SHOP_SUFFIX: &str = ".myshopify.com";

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (shop, API version, client).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (shop, API version, client).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (shop, API version, client).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier does not follow the expected shape.
	#[error("{kind} identifier must look like {expected}.")]
	Malformed {
		/// Kind of identifier (shop, API version, client).
		kind: &'static str,
		/// Example of the accepted shape.
		expected: &'static str,
	},
}

def_id! { ShopDomain, "Shop host of the form `store.myshopify.com`.", "Shop", validate_shop }
def_id! { ApiVersion, "Admin API version such as `2026-01` or `unstable`.", "ApiVersion", validate_api_version }
def_id! { ClientId, "OAuth client identifier issued for the custom app.", "Client", validate_view }

impl ShopDomain {
	/// Returns the shop handle (the part before `.myshopify.com`).
	pub fn handle(&self) -> &str {
		self.0.strip_suffix(SHOP_SUFFIX).unwrap_or(&self.0)
	}
}

impl ApiVersion {
	/// Version used when none is configured.
	pub const DEFAULT: &'static str = "2026-01";
}
impl Default for ApiVersion {
	fn default() -> Self {
		Self(Self::DEFAULT.into())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn validate_shop(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	validate_view(kind, view)?;

	let malformed = IdentifierError::Malformed { kind, expected: "store.myshopify.com" };
	let handle = view.strip_suffix(SHOP_SUFFIX).ok_or_else(|| malformed.clone())?;

	if handle.is_empty()
		|| !handle.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
	{
		return Err(malformed);
	}

	Ok(())
}

fn validate_api_version(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	validate_view(kind, view)?;

	if view == "unstable" {
		return Ok(());
	}

	let malformed = IdentifierError::Malformed { kind, expected: "YYYY-MM" };
	let (year, month) = view.split_once('-').ok_or_else(|| malformed.clone())?;

	if year.len() != 4 || month.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
		return Err(malformed);
	}
	match month.parse::<u8>() {
		Ok(1..=12) => Ok(()),
		_ => Err(malformed),
	}
}
