//! Field-level input validation shared by every post sub-entity.
//!
//! These are the primitive shape checks (hex digests, URIs, shortcodes,
//! optional data limits) that the aggregate validators compose. They are
//! pure functions: the same input always yields the same verdict on every
//! replica.

use crate::error::{PostsError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use url::Url;

/// Length in hex characters of post ids and subspaces (SHA-256/SHA3-256 sized).
pub const HEX_DIGEST_LENGTH: usize = 64;

/// URI schemes accepted for attachments and registered reactions.
pub const ALLOWED_URI_SCHEMES: &[&str] = &["http", "https"];

static POST_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{64}$").expect("static post id pattern"));

static SUBSPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").expect("static subspace pattern"));

static SHORTCODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:[a-z0-9+-]([a-z0-9_-])*:$").expect("static shortcode pattern"));

/// Validation functions for post input fields
pub struct Validator;

impl Validator {
    /// Returns true if `value` is exactly 64 lowercase hex characters.
    pub fn is_valid_post_id(value: &str) -> bool {
        POST_ID_REGEX.is_match(value)
    }

    /// Returns true if `value` is shaped like a 64 character hex hash.
    pub fn is_valid_subspace(value: &str) -> bool {
        SUBSPACE_REGEX.is_match(value)
    }

    /// Returns true if `value` matches the emoji shortcode grammar,
    /// e.g. `:+1:` or `:my-reaction:`.
    pub fn is_valid_shortcode(value: &str) -> bool {
        SHORTCODE_REGEX.is_match(value)
    }

    /// Returns true if `value` is an absolute http(s) URL with a host.
    pub fn is_valid_uri(value: &str) -> bool {
        match Url::parse(value) {
            Ok(url) => {
                ALLOWED_URI_SCHEMES.contains(&url.scheme())
                    && url.host_str().map(|h| !h.is_empty()).unwrap_or(false)
            }
            Err(_) => false,
        }
    }

    /// Validate a subspace identifier
    pub fn validate_subspace(subspace: &str) -> Result<()> {
        if !Self::is_valid_subspace(subspace) {
            return Err(PostsError::invalid_subspace(format!(
                "subspace must be a {} character hex hash, got {:?}",
                HEX_DIGEST_LENGTH, subspace
            )));
        }
        Ok(())
    }

    /// Validate a media or reaction URI
    pub fn validate_uri(uri: &str) -> Result<()> {
        if !Self::is_valid_uri(uri) {
            return Err(PostsError::invalid_uri(format!(
                "{:?} is not an absolute http(s) URL",
                uri
            )));
        }
        Ok(())
    }

    /// Validate message length in bytes
    pub fn validate_message_length(message: &str, max_length: usize) -> Result<()> {
        if message.len() > max_length {
            return Err(PostsError::exceeds_limit(format!(
                "message too long: {} bytes exceeds maximum of {} bytes",
                message.len(),
                max_length
            )));
        }
        Ok(())
    }

    /// Validate the number and size of optional data entries
    pub fn validate_optional_data(
        data: &BTreeMap<String, String>,
        max_fields: usize,
        max_value_length: usize,
    ) -> Result<()> {
        if data.len() > max_fields {
            return Err(PostsError::exceeds_limit(format!(
                "optional data cannot contain more than {} fields, got {}",
                max_fields,
                data.len()
            )));
        }

        for (key, value) in data {
            if value.trim().len() > max_value_length {
                return Err(PostsError::exceeds_limit(format!(
                    "optional data value for key {:?} exceeds {} characters",
                    key, max_value_length
                )));
            }
        }
        Ok(())
    }
}
