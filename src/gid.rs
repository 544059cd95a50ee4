//! Shopify global ID and money helpers.
//!
//! Admin API objects are addressed by global IDs such as `gid://shopify/Product/123`; callers
//! usually hold only the numeric part.

const GID_PREFIX: &str = "gid://shopify/";

/// Extracts the trailing numeric ID from a global ID.
///
/// Input that does not end in `/<digits>` is returned unchanged.
pub fn parse_gid(gid: &str) -> &str {
	match gid.rsplit_once('/') {
		Some((_, id)) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => id,
		_ => gid,
	}
}

/// Builds `gid://shopify/{kind}/{id}`, keeping only the digits of `id`.
pub fn to_gid(kind: &str, id: impl AsRef<str>) -> String {
	let numeric = id.as_ref().chars().filter(char::is_ascii_digit).collect::<String>();

	format!("{GID_PREFIX}{kind}/{numeric}")
}

/// Passes global IDs through and converts anything else with [`to_gid`].
pub fn ensure_gid(kind: &str, id: &str) -> String {
	if id.contains("gid://") { id.to_owned() } else { to_gid(kind, id) }
}

/// Formats a decimal amount as `{currency} {amount}` with two decimals.
///
/// Returns `None` when `amount` is not a finite number.
pub fn format_money(amount: &str, currency_code: &str) -> Option<String> {
	let value = amount.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;

	Some(format!("{currency_code} {value:.2}"))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_gid_extracts_trailing_digits() {
		assert_eq!(parse_gid("gid://shopify/Product/123"), "123");
		assert_eq!(parse_gid("gid://shopify/Product/abc"), "gid://shopify/Product/abc");
		assert_eq!(parse_gid("gid://shopify/Product/"), "gid://shopify/Product/");
		assert_eq!(parse_gid("456"), "456");
	}

	#[test]
	fn to_gid_strips_non_digits() {
		assert_eq!(to_gid("Product", "abc123"), "gid://shopify/Product/123");
		assert_eq!(to_gid("Order", 42.to_string()), "gid://shopify/Order/42");
	}

	#[test]
	fn ensure_gid_keeps_existing_ids() {
		assert_eq!(ensure_gid("Collection", "gid://shopify/Collection/9"), "gid://shopify/Collection/9");
		assert_eq!(ensure_gid("Collection", "9"), "gid://shopify/Collection/9");
	}

	#[test]
	fn format_money_uses_two_decimals() {
		assert_eq!(format_money("12.5", "USD").as_deref(), Some("USD 12.50"));
		assert_eq!(format_money("0", "EUR").as_deref(), Some("EUR 0.00"));
		assert_eq!(format_money("n/a", "USD"), None);
		assert_eq!(format_money("NaN", "USD"), None);
	}
}
