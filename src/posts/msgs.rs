//! Messages accepted by the posts state machine.
//!
//! `PostMsg` is a closed sum over every supported message. Each variant has
//! a stateless `validate_basic` that the transaction layer runs before the
//! keeper looks at any stored state.

use crate::error::{PostsError, Result};
use crate::posts::attachment::Attachments;
use crate::posts::constants::{
    DEFAULT_MAX_OPTIONAL_DATA_FIELDS, DEFAULT_MAX_OPTIONAL_DATA_VALUE_LENGTH,
};
use crate::posts::emoji::EmojiAliases;
use crate::posts::id::PostId;
use crate::posts::poll::PollData;
use crate::posts::post::{NewPost, PostEdit};
use crate::posts::reaction::RegisteredReaction;
use crate::posts::types::{Address, MsgType};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn require_post_id(id: &PostId) -> Result<()> {
    if !id.is_well_formed() {
        return Err(PostsError::invalid_id(format!("invalid post id: {}", id)));
    }
    Ok(())
}

fn require_address(address: &Address, role: &str) -> Result<()> {
    if address.is_empty() {
        return Err(PostsError::invalid_address(format!("invalid {}", role)));
    }
    Ok(())
}

fn require_reaction(reaction: &str, aliases: &dyn EmojiAliases) -> Result<()> {
    if reaction.trim().is_empty() {
        return Err(PostsError::empty_value("reaction cannot be blank"));
    }
    if !Validator::is_valid_shortcode(reaction) && !aliases.is_emoji(reaction) {
        return Err(PostsError::invalid_shortcode(format!(
            "{:?} is neither a shortcode nor an emoji",
            reaction
        )));
    }
    Ok(())
}

/// Creates a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreatePost {
    #[serde(default)]
    pub parent_id: Option<PostId>,
    #[serde(default)]
    pub message: String,
    pub allows_comments: bool,
    pub subspace: String,
    #[serde(default)]
    pub optional_data: BTreeMap<String, String>,
    pub creator: Address,
    pub creation_date: u64,
    #[serde(default)]
    pub attachments: Attachments,
    #[serde(default)]
    pub poll: Option<PollData>,
}

impl MsgCreatePost {
    pub fn validate_basic(&self) -> Result<()> {
        require_address(&self.creator, "creator")?;

        if let Some(parent_id) = &self.parent_id {
            require_post_id(parent_id)?;
        }

        if self.message.trim().is_empty() && self.attachments.is_empty() && self.poll.is_none() {
            return Err(PostsError::empty_content(
                "post message, attachments or poll are required and cannot be all blank or empty",
            ));
        }

        Validator::validate_subspace(&self.subspace)?;
        Validator::validate_optional_data(
            &self.optional_data,
            DEFAULT_MAX_OPTIONAL_DATA_FIELDS,
            DEFAULT_MAX_OPTIONAL_DATA_VALUE_LENGTH,
        )?;

        if self.creation_date == 0 {
            return Err(PostsError::invalid_timestamp("creation date must be set"));
        }

        self.attachments.validate_all()?;

        if let Some(poll) = &self.poll {
            if !poll.is_open {
                return Err(PostsError::poll_closed("a new poll must be open"));
            }
            poll.validate()?;
        }

        Ok(())
    }

    /// The post fields this message describes.
    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            parent_id: self.parent_id.clone(),
            message: self.message.clone(),
            allows_comments: self.allows_comments,
            subspace: self.subspace.clone(),
            optional_data: self.optional_data.clone(),
            created: self.creation_date,
            creator: self.creator.clone(),
            attachments: self.attachments.clone(),
            poll: self.poll.clone(),
        }
    }
}

/// Replaces the content of an existing post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEditPost {
    pub post_id: PostId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attachments: Option<Attachments>,
    #[serde(default)]
    pub poll: Option<PollData>,
    pub editor: Address,
    pub edit_date: u64,
}

impl MsgEditPost {
    pub fn validate_basic(&self) -> Result<()> {
        require_post_id(&self.post_id)?;
        require_address(&self.editor, "editor")?;

        let no_attachments = self.attachments.as_ref().map_or(true, Attachments::is_empty);
        if self.message.trim().is_empty() && no_attachments && self.poll.is_none() {
            return Err(PostsError::empty_content(
                "edited post message, attachments or poll are required and cannot be all blank or empty",
            ));
        }

        if self.edit_date == 0 {
            return Err(PostsError::invalid_timestamp("edit date must be set"));
        }

        if let Some(attachments) = &self.attachments {
            attachments.validate_all()?;
        }
        if let Some(poll) = &self.poll {
            poll.validate()?;
        }
        Ok(())
    }

    pub fn to_post_edit(&self) -> PostEdit {
        PostEdit {
            message: self.message.clone(),
            attachments: self.attachments.clone(),
            poll: self.poll.clone(),
            edit_date: self.edit_date,
        }
    }
}

/// Adds a reaction, given as shortcode or emoji, to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddPostReaction {
    pub post_id: PostId,
    pub reaction: String,
    pub user: Address,
}

impl MsgAddPostReaction {
    pub fn validate_basic(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        require_post_id(&self.post_id)?;
        require_address(&self.user, "user")?;
        require_reaction(&self.reaction, aliases)
    }
}

/// Removes a reaction, given as shortcode or emoji, from a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemovePostReaction {
    pub post_id: PostId,
    pub user: Address,
    pub reaction: String,
}

impl MsgRemovePostReaction {
    pub fn validate_basic(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        require_post_id(&self.post_id)?;
        require_address(&self.user, "user")?;
        require_reaction(&self.reaction, aliases)
    }
}

/// Answers the poll of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAnswerPoll {
    pub post_id: PostId,
    pub answers: Vec<u64>,
    pub answerer: Address,
}

impl MsgAnswerPoll {
    pub fn validate_basic(&self) -> Result<()> {
        require_post_id(&self.post_id)?;
        require_address(&self.answerer, "answerer")?;
        if self.answers.is_empty() {
            return Err(PostsError::empty_answers(
                "provided answer must contain at least one answer",
            ));
        }
        Ok(())
    }
}

/// Registers a custom reaction inside a subspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterReaction {
    pub shortcode: String,
    pub value: String,
    pub subspace: String,
    pub creator: Address,
}

impl MsgRegisterReaction {
    pub fn validate_basic(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        self.to_registered_reaction().validate(aliases)
    }

    pub fn to_registered_reaction(&self) -> RegisteredReaction {
        RegisteredReaction::new(
            self.creator.clone(),
            self.shortcode.clone(),
            self.value.clone(),
            self.subspace.clone(),
        )
    }
}

/// Every message the posts module handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostMsg {
    CreatePost(MsgCreatePost),
    EditPost(MsgEditPost),
    AddPostReaction(MsgAddPostReaction),
    RemovePostReaction(MsgRemovePostReaction),
    AnswerPoll(MsgAnswerPoll),
    RegisterReaction(MsgRegisterReaction),
}

impl PostMsg {
    /// Runs the stateless checks of the wrapped message.
    pub fn validate_basic(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        match self {
            PostMsg::CreatePost(msg) => msg.validate_basic(),
            PostMsg::EditPost(msg) => msg.validate_basic(),
            PostMsg::AddPostReaction(msg) => msg.validate_basic(aliases),
            PostMsg::RemovePostReaction(msg) => msg.validate_basic(aliases),
            PostMsg::AnswerPoll(msg) => msg.validate_basic(),
            PostMsg::RegisterReaction(msg) => msg.validate_basic(aliases),
        }
    }

    pub fn msg_type(&self) -> MsgType {
        match self {
            PostMsg::CreatePost(_) => MsgType::CreatePost,
            PostMsg::EditPost(_) => MsgType::EditPost,
            PostMsg::AddPostReaction(_) => MsgType::AddPostReaction,
            PostMsg::RemovePostReaction(_) => MsgType::RemovePostReaction,
            PostMsg::AnswerPoll(_) => MsgType::AnswerPoll,
            PostMsg::RegisterReaction(_) => MsgType::RegisterReaction,
        }
    }

    /// The account that authored the message.
    pub fn signer(&self) -> &Address {
        match self {
            PostMsg::CreatePost(msg) => &msg.creator,
            PostMsg::EditPost(msg) => &msg.editor,
            PostMsg::AddPostReaction(msg) => &msg.user,
            PostMsg::RemovePostReaction(msg) => &msg.user,
            PostMsg::AnswerPoll(msg) => &msg.answerer,
            PostMsg::RegisterReaction(msg) => &msg.creator,
        }
    }
}
