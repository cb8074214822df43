//! Shared value types for the posts state machine.
//!
//! This module contains types used across several sub-entities:
//! - `Address`: account reference of creators, owners, answerers and tags
//! - `MsgType`: discriminator for the message variants
//!
//! For the content identifier type `PostId`, see the `id` module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account reference.
///
/// Addresses are opaque to the core: the only structural requirement is that
/// they are not empty. Resolution and signature checks belong to the
/// transaction layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the address is empty or blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Type discriminator for post messages.
///
/// Each message variant has a stable identifier used in logs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MsgType {
    /// Create a new post.
    CreatePost = 1,
    /// Edit an existing post's content.
    EditPost = 2,
    /// Add a reaction to a post.
    AddPostReaction = 3,
    /// Remove a reaction from a post.
    RemovePostReaction = 4,
    /// Answer a post's poll.
    AnswerPoll = 5,
    /// Register a custom reaction within a subspace.
    RegisterReaction = 6,
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgType::CreatePost => write!(f, "create_post"),
            MsgType::EditPost => write!(f, "edit_post"),
            MsgType::AddPostReaction => write!(f, "add_post_reaction"),
            MsgType::RemovePostReaction => write!(f, "remove_post_reaction"),
            MsgType::AnswerPoll => write!(f, "answer_poll"),
            MsgType::RegisterReaction => write!(f, "register_reaction"),
        }
    }
}
