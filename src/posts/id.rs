//! Content-addressed post identifiers.
//!
//! This module provides the `PostId` type and the `compute` function that
//! derives it. The digest is SHA3-256 over the bincode serialization of every
//! post field except the identifiers themselves, hex-encoded lowercase.
//!
//! Determinism is a hard requirement: the preimage struct fixes field order,
//! encodes absent values with an explicit `Option` tag, and carries optional
//! data as a `BTreeMap` so no hash-map iteration order can leak in.

use crate::error::{PostsError, Result};
use crate::posts::attachment::Attachment;
use crate::posts::poll::PollData;
use crate::posts::post::Post;
use crate::posts::types::Address;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;
use std::fmt;

/// Version tag mixed into every preimage so a future layout change can never
/// collide with digests produced by this one.
const PREIMAGE_VERSION: u8 = 1;

/// A post identifier: 64 lowercase hex characters.
///
/// The value is kept as a string so that ids read from external input can be
/// held and then checked with [`PostId::is_well_formed`]. Use
/// [`PostId::parse`] at trust boundaries.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Parses a post id, failing with `InvalidId` if it is not well formed.
    pub fn parse(value: &str) -> Result<Self> {
        if !is_well_formed(value) {
            return Err(PostsError::invalid_id(format!(
                "{:?} is not a valid post id",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Wraps a raw value without checking it.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a PostId from a raw 32-byte digest.
    pub fn from_digest(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this id is exactly 64 lowercase hex characters.
    pub fn is_well_formed(&self) -> bool {
        is_well_formed(&self.0)
    }

    /// Returns a short form of the id for display (first 16 hex chars).
    pub fn short(&self) -> &str {
        self.0.get(..16).unwrap_or(&self.0)
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({}...)", self.short())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `value` has the fixed hex-digest shape of a post id.
pub fn is_well_formed(value: &str) -> bool {
    Validator::is_valid_post_id(value)
}

/// Borrowed canonical view of a post, in hashing order.
#[derive(Serialize)]
struct PostIdPreimage<'a> {
    version: u8,
    parent_id: Option<&'a PostId>,
    message: &'a str,
    created: u64,
    last_edited: Option<u64>,
    allows_comments: bool,
    subspace: &'a str,
    optional_data: &'a BTreeMap<String, String>,
    creator: &'a Address,
    attachments: &'a [Attachment],
    poll: Option<&'a PollData>,
}

impl<'a> From<&'a Post> for PostIdPreimage<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            version: PREIMAGE_VERSION,
            parent_id: post.parent_id.as_ref(),
            message: &post.message,
            created: post.created,
            last_edited: post.last_edited,
            allows_comments: post.allows_comments,
            subspace: &post.subspace,
            optional_data: &post.optional_data,
            creator: &post.creator,
            attachments: post.attachments.as_slice(),
            poll: post.poll.as_ref(),
        }
    }
}

/// Returns the canonical bytes hashed by [`compute`].
pub fn canonical_bytes(post: &Post) -> Result<Vec<u8>> {
    bincode::serialize(&PostIdPreimage::from(post)).map_err(|e| {
        PostsError::serialization(format!("Failed to serialize post for hashing: {}", e))
    })
}

/// Computes the content-addressed id of `post`.
///
/// `id` and `content_hash` are excluded from the preimage, so a post's
/// digest can be recomputed and compared against its stored hash.
pub fn compute(post: &Post) -> Result<PostId> {
    let bytes = canonical_bytes(post)?;
    Ok(PostId::from_digest(hash_data(&bytes)))
}

/// SHA3-256 of `data`.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}
