//! Extension points for attaching credentials to outbound requests.
//!
//! The Admin client signs every request through a [`RequestSigner`], so callers that front
//! Shopify with a proxy expecting `Authorization: Bearer` can swap the header without touching
//! the credential logic.

pub mod request_signer;

pub use request_signer::*;
