//! Token Validation Module
//!
//! This module provides the token-level stages of the gate.
//!
//! # Modules
//!
//! - [`core`] - Segment splitting, base64url decoding and claim helpers
//! - [`structure`] - Structural check of compact tokens
//! - [`payload`] - Required-claim, expiry and audience checks

pub mod core;
pub mod payload;
pub mod structure;

// Re-export commonly used items for convenience
pub use self::core::{decode_and_parse_jwt_part, decode_segment, extract_audiences_from_claim};
pub use payload::{
    check_token_payload, validate_token_payload, validate_token_payload_at, PayloadCheck,
    PayloadRejection,
};
pub use structure::is_valid_jwt_structure;
