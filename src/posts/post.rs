//! The post aggregate and its validation pipeline.
//!
//! A post is identified by a stable `id`, assigned once from the content
//! digest at creation, and carries a `content_hash` that is recomputed on
//! every edit. The hash lets any replica verify that stored content matches
//! what was hashed, while references to the post (parents, reactions, poll
//! answers) survive edits.
//!
//! ## Validation Order
//!
//! `Post::validate` is fail-fast and always checks, in order:
//! 1. id well formed
//! 2. creator present
//! 3. some content (message, attachments or poll)
//! 4. subspace shape
//! 5. creation time set
//! 6. last edit not before creation
//! 7. attachments
//! 8. poll, if present

use crate::error::{PostsError, Result};
use crate::posts::attachment::Attachments;
use crate::posts::hashtag;
use crate::posts::id::{self, PostId};
use crate::posts::poll::{polls_equal, PollData};
use crate::posts::types::Address;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A user-authored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content_hash: PostId,
    #[serde(default)]
    pub parent_id: Option<PostId>,
    #[serde(default)]
    pub message: String,
    /// Creation time in milliseconds.
    pub created: u64,
    #[serde(default)]
    pub last_edited: Option<u64>,
    pub allows_comments: bool,
    pub subspace: String,
    #[serde(default)]
    pub optional_data: BTreeMap<String, String>,
    pub creator: Address,
    #[serde(default)]
    pub attachments: Attachments,
    #[serde(default)]
    pub poll: Option<PollData>,
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent_id: Option<PostId>,
    #[serde(default)]
    pub message: String,
    pub allows_comments: bool,
    pub subspace: String,
    #[serde(default)]
    pub optional_data: BTreeMap<String, String>,
    pub created: u64,
    pub creator: Address,
    #[serde(default)]
    pub attachments: Attachments,
    #[serde(default)]
    pub poll: Option<PollData>,
}

/// Replacement content for an edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEdit {
    pub message: String,
    #[serde(default)]
    pub attachments: Option<Attachments>,
    #[serde(default)]
    pub poll: Option<PollData>,
    pub edit_date: u64,
}

impl Post {
    /// Builds a post and stamps both `id` and `content_hash` from its content.
    pub fn new(fields: NewPost) -> Result<Self> {
        let mut post = Post {
            id: PostId::default(),
            content_hash: PostId::default(),
            parent_id: fields.parent_id,
            message: fields.message,
            created: fields.created,
            last_edited: None,
            allows_comments: fields.allows_comments,
            subspace: fields.subspace,
            optional_data: fields.optional_data,
            creator: fields.creator,
            attachments: fields.attachments,
            poll: fields.poll,
        };
        let digest = id::compute(&post)?;
        post.id = digest.clone();
        post.content_hash = digest;
        Ok(post)
    }

    /// Returns an edited copy of this post.
    ///
    /// The id is kept, `last_edited` is set and the content hash recomputed.
    pub fn edit(&self, edit: PostEdit) -> Result<Self> {
        let mut edited = self.clone();
        edited.message = edit.message;
        if let Some(attachments) = edit.attachments {
            edited.attachments = attachments;
        }
        if let Some(poll) = edit.poll {
            edited.poll = Some(poll);
        }
        edited.last_edited = Some(edit.edit_date);
        edited.content_hash = id::compute(&edited)?;
        Ok(edited)
    }

    /// Returns true if the message is blank and there are no attachments or
    /// poll.
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty() && self.attachments.is_empty() && self.poll.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.id.is_well_formed() {
            return Err(PostsError::invalid_id(format!("invalid post id: {}", self.id)));
        }

        if self.creator.is_empty() {
            return Err(PostsError::invalid_address("post creator cannot be empty"));
        }

        if self.is_empty() {
            return Err(PostsError::empty_content(
                "post message, attachments or poll required, they cannot be all empty",
            ));
        }

        Validator::validate_subspace(&self.subspace)?;

        if self.created == 0 {
            return Err(PostsError::invalid_timestamp("post creation time must be set"));
        }

        if let Some(last_edited) = self.last_edited {
            if last_edited < self.created {
                return Err(PostsError::invalid_timestamp(format!(
                    "post last edit time {} is before creation time {}",
                    last_edited, self.created
                )));
            }
        }

        self.attachments.validate_all()?;

        if let Some(poll) = &self.poll {
            poll.validate()?;
        }

        Ok(())
    }

    /// Recomputes the digest and checks it against `content_hash`.
    pub fn verify_content_hash(&self) -> Result<()> {
        let computed = id::compute(self)?;
        if computed != self.content_hash {
            return Err(PostsError::invalid_id(format!(
                "content hash mismatch for post {}: stored {}, computed {}",
                self.id.short(),
                self.content_hash.short(),
                computed.short()
            )));
        }
        Ok(())
    }

    /// Deep equality including `id`.
    pub fn equals(&self, other: &Post) -> bool {
        self.id == other.id && self.contents_equals(other)
    }

    /// Deep equality ignoring `id` and `content_hash`.
    pub fn contents_equals(&self, other: &Post) -> bool {
        self.parent_id == other.parent_id
            && self.message == other.message
            && self.created == other.created
            && self.last_edited == other.last_edited
            && self.allows_comments == other.allows_comments
            && self.subspace == other.subspace
            && self.optional_data == other.optional_data
            && self.creator == other.creator
            && self.attachments == other.attachments
            && polls_equal(self.poll.as_ref(), other.poll.as_ref())
    }

    /// Hashtags mentioned in the message.
    pub fn hashtags(&self) -> BTreeSet<String> {
        hashtag::extract(&self.message)
    }
}
