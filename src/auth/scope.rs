//! Granted access scopes attached to issued credentials.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes supplied by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized, deduplicated set of scope names (`read_products`, `write_orders`, ...).
///
/// Scopes are sorted so equality and hashing do not depend on the order in which the
/// token endpoint listed them.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeSet {
	scopes: Arc<[String]>,
}
impl ScopeSet {
	/// Delimiter used by Shopify's token endpoint.
	pub const DELIMITER: char = ',';

	/// Creates a normalized scope set from any iterator, rejecting empty or padded entries.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut set = BTreeSet::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
			}

			set.insert(owned);
		}

		Ok(Self::from_set(set))
	}

	/// Parses a scope string as granted by an authority.
	///
	/// The input is split on `delimiter` and every piece is trimmed; empty pieces are dropped,
	/// so an empty string yields an empty set. This never fails.
	pub fn parse_delimited(raw: &str, delimiter: char) -> Self {
		let set = raw
			.split(delimiter)
			.map(str::trim)
			.filter(|piece| !piece.is_empty())
			.map(str::to_owned)
			.collect::<BTreeSet<_>>();

		Self::from_set(set)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Iterator over scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Joins the scopes with `separator`.
	pub fn join(&self, separator: &str) -> String {
		self.scopes.join(separator)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}

	fn from_set(set: BTreeSet<String>) -> Self {
		Self { scopes: Arc::from(set.into_iter().collect::<Vec<_>>()) }
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.scopes).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(", "))
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse_delimited(s, Self::DELIMITER))
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeSet {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.scopes.iter() }
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeSet::new(values).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn granted_scopes_split_on_commas_and_trim() {
		let scopes = ScopeSet::parse_delimited("read_products, write_orders,read_customers", ',');
		let expected = ScopeSet::new(["read_customers", "read_products", "write_orders"])
			.expect("Expected scope fixture should be valid.");

		assert_eq!(scopes, expected);
		assert_eq!(scopes.len(), 3);
		assert!(scopes.contains("write_orders"));
		assert!(!scopes.contains(" write_orders"));
	}

	#[test]
	fn empty_and_blank_pieces_yield_no_scopes() {
		assert!(ScopeSet::parse_delimited("", ',').is_empty());
		assert!(ScopeSet::parse_delimited(" , ,", ',').is_empty());
		assert_eq!(
			ScopeSet::parse_delimited("read_themes,,read_themes ", ',').as_slice(),
			["read_themes".to_string()].as_slice(),
		);
	}

	#[test]
	fn order_does_not_affect_equality() {
		let lhs = ScopeSet::from_str("write_orders,read_products")
			.expect("Scope string should parse successfully.");
		let rhs = ScopeSet::from_str("read_products, write_orders")
			.expect("Scope string should parse successfully.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.to_string(), "read_products, write_orders");
		assert_eq!(lhs.iter().collect::<Vec<_>>(), vec!["read_products", "write_orders"]);
	}

	#[test]
	fn explicit_scopes_reject_padding() {
		let err = ScopeSet::new([" read_products "]).expect_err("Padded scopes must be rejected.");

		assert!(matches!(err, ScopeValidationError::ContainsWhitespace { .. }));
		assert!(ScopeSet::new([""]).is_err());
	}

	#[test]
	fn serde_round_trips_as_sequence() {
		let scopes = ScopeSet::parse_delimited("read_orders,read_products", ',');
		let payload = serde_json::to_string(&scopes).expect("Scope set should serialize.");

		assert_eq!(payload, "[\"read_orders\",\"read_products\"]");

		let back: ScopeSet = serde_json::from_str(&payload).expect("Scope set should deserialize.");

		assert_eq!(back, scopes);
	}
}
