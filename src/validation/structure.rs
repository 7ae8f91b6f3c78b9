//! Cheap structural check for compact bearer tokens
//!
//! Rejects truncated tokens, accidental concatenations and values that are
//! not tokens at all before any JSON parsing happens. Signatures are not
//! verified here; that belongs to the issuing identity provider.

use super::core::{decode_segment, split_token};

/// Check that a token has three non-empty, base64url-decodable segments
///
/// Never panics and never inspects claim contents; every failure is folded
/// into `false`.
#[must_use]
pub fn is_valid_jwt_structure(token: &str) -> bool {
    split_token(token).is_some_and(|segments| {
        segments
            .iter()
            .all(|segment| decode_segment(segment).is_ok())
    })
}
