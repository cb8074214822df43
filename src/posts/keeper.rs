//! Applies post messages to a key-value store.
//!
//! The keeper owns the store, the active [`Params`] and the emoji table.
//! Every handler runs all of its checks before the first write, so a
//! rejected message never leaves partial state behind.

use crate::error::{PostsError, Result};
use crate::posts::constants::*;
use crate::posts::emoji::{strip_variation_selector, EmojiAliases, EmojiTable};
use crate::posts::id::PostId;
use crate::posts::msgs::{
    MsgAddPostReaction, MsgAnswerPoll, MsgCreatePost, MsgEditPost, MsgRegisterReaction,
    MsgRemovePostReaction, PostMsg,
};
use crate::posts::params::Params;
use crate::posts::poll::{UserAnswer, UserAnswers};
use crate::posts::post::Post;
use crate::posts::reaction::{PostReaction, PostReactions, Reactions, RegisteredReaction};
use crate::posts::types::Address;
use crate::storage::{decode, prefixed_key, KvStore};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A typed event emitted by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    /// Returns the value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Result of a successfully handled message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Id of the created or edited post, if any.
    pub post_id: Option<PostId>,
    pub events: Vec<Event>,
}

impl HandlerOutcome {
    fn new(post_id: Option<PostId>, event: Event) -> Self {
        Self {
            post_id,
            events: vec![event],
        }
    }
}

fn post_key(id: &PostId) -> Vec<u8> {
    prefixed_key(POST_STORE_PREFIX, id.as_str().as_bytes())
}

fn poll_answers_key(id: &PostId) -> Vec<u8> {
    prefixed_key(POLL_ANSWERS_STORE_PREFIX, id.as_str().as_bytes())
}

fn post_reactions_key(id: &PostId) -> Vec<u8> {
    prefixed_key(POST_REACTIONS_STORE_PREFIX, id.as_str().as_bytes())
}

fn registered_reaction_key(shortcode: &str, subspace: &str) -> Vec<u8> {
    let suffix = format!("{}{}", shortcode, subspace);
    prefixed_key(REGISTERED_REACTIONS_STORE_PREFIX, suffix.as_bytes())
}

/// Recovers the post id from a `<prefix><id>` key.
fn id_from_key(prefix: &[u8], key: &[u8]) -> Result<PostId> {
    let suffix = key.get(prefix.len()..).unwrap_or_default();
    let raw = std::str::from_utf8(suffix)
        .map_err(|e| PostsError::storage(format!("Invalid key encoding: {}", e)))?;
    Ok(PostId::from_raw(raw))
}

/// State machine for posts, reactions and poll answers.
pub struct Keeper<S: KvStore> {
    store: S,
    params: Params,
    emojis: EmojiTable,
}

impl<S: KvStore> Keeper<S> {
    pub fn new(store: S, params: Params, emojis: EmojiTable) -> Self {
        Self {
            store,
            params,
            emojis,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replaces the active params after validating them.
    pub fn set_params(&mut self, params: Params) -> Result<()> {
        params.validate()?;
        info!("Posts params updated: {}", params);
        self.params = params;
        Ok(())
    }

    pub fn emojis(&self) -> &EmojiTable {
        &self.emojis
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Stores `post` under `post:<id>`, overwriting any previous version.
    pub fn save_post(&mut self, post: &Post) -> Result<()> {
        self.store.put(&post_key(&post.id), post)?;
        debug!(post = %post.id.short(), "post saved");
        Ok(())
    }

    pub fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        self.store.get(&post_key(id))
    }

    pub fn post_exists(&self, id: &PostId) -> Result<bool> {
        self.store.exists(&post_key(id))
    }

    /// All stored posts, ordered by id.
    pub fn get_posts(&self) -> Result<Vec<Post>> {
        self.store.prefix_collect(POST_STORE_PREFIX)
    }

    fn require_post(&self, id: &PostId) -> Result<Post> {
        self.get_post(id)?
            .ok_or_else(|| PostsError::not_found(format!("post with id {} not found", id)))
    }

    // =========================================================================
    // Post reactions
    // =========================================================================

    pub fn get_post_reactions(&self, id: &PostId) -> Result<PostReactions> {
        Ok(self.store.get(&post_reactions_key(id))?.unwrap_or_default())
    }

    /// Adds `reaction` to the post, failing with `Conflict` if the owner
    /// already reacted with the same shortcode.
    pub fn save_post_reaction(&mut self, id: &PostId, reaction: PostReaction) -> Result<()> {
        let reactions = self.get_post_reactions(id)?;
        if reactions.contains_reaction_from(&reaction.owner, &reaction.shortcode) {
            return Err(PostsError::conflict(format!(
                "{} has already reacted with {} to the post with id {}",
                reaction.owner, reaction.shortcode, id
            )));
        }
        let (updated, _) = reactions.append_if_missing(reaction);
        self.store.put(&post_reactions_key(id), &updated)
    }

    /// Removes the owner's reaction with `shortcode`, failing with
    /// `NotFound` if there is none.
    pub fn remove_post_reaction(
        &mut self,
        id: &PostId,
        owner: &Address,
        shortcode: &str,
    ) -> Result<()> {
        let reactions = self.get_post_reactions(id)?;
        let (remaining, removed) = reactions.remove_reaction(owner, shortcode);
        if !removed {
            return Err(PostsError::not_found(format!(
                "cannot remove the reaction with value {} from user {} as it does not exist",
                shortcode, owner
            )));
        }
        if remaining.is_empty() {
            self.store.delete(&post_reactions_key(id))
        } else {
            self.store.put(&post_reactions_key(id), &remaining)
        }
    }

    /// Reactions of every post that has any, keyed by post id.
    pub fn get_all_post_reactions(&self) -> Result<BTreeMap<PostId, PostReactions>> {
        self.collect_by_post(POST_REACTIONS_STORE_PREFIX)
    }

    // =========================================================================
    // Poll answers
    // =========================================================================

    pub fn get_poll_answers(&self, id: &PostId) -> Result<UserAnswers> {
        Ok(self.store.get(&poll_answers_key(id))?.unwrap_or_default())
    }

    /// Records `answer`, replacing the answerer's previous one. Returns
    /// whether the stored answers changed.
    pub fn save_poll_answer(&mut self, id: &PostId, answer: UserAnswer) -> Result<bool> {
        let (updated, changed) = self.get_poll_answers(id)?.reconcile(answer);
        if changed {
            self.store.put(&poll_answers_key(id), &updated)?;
        }
        Ok(changed)
    }

    /// Poll answers of every post that has any, keyed by post id.
    pub fn get_all_poll_answers(&self) -> Result<BTreeMap<PostId, UserAnswers>> {
        self.collect_by_post(POLL_ANSWERS_STORE_PREFIX)
    }

    fn set_poll_answers(&mut self, id: &PostId, answers: &UserAnswers) -> Result<()> {
        self.store.put(&poll_answers_key(id), answers)
    }

    fn set_post_reactions(&mut self, id: &PostId, reactions: &PostReactions) -> Result<()> {
        self.store.put(&post_reactions_key(id), reactions)
    }

    fn collect_by_post<T: serde::de::DeserializeOwned>(
        &self,
        prefix: &[u8],
    ) -> Result<BTreeMap<PostId, T>> {
        let mut entries = BTreeMap::new();
        let mut failure = None;
        self.store.prefix_iterate(prefix, &mut |key, value| {
            let entry = id_from_key(prefix, key).and_then(|id| Ok((id, decode(value)?)));
            match entry {
                Ok((id, decoded)) => {
                    entries.insert(id, decoded);
                    true
                }
                Err(e) => {
                    failure = Some(e);
                    false
                }
            }
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(entries),
        }
    }

    // =========================================================================
    // Registered reactions
    // =========================================================================

    pub fn register_reaction(&mut self, reaction: &RegisteredReaction) -> Result<()> {
        let key = registered_reaction_key(&reaction.shortcode, &reaction.subspace);
        self.store.put(&key, reaction)
    }

    pub fn get_registered_reaction(
        &self,
        shortcode: &str,
        subspace: &str,
    ) -> Result<Option<RegisteredReaction>> {
        self.store.get(&registered_reaction_key(shortcode, subspace))
    }

    pub fn get_registered_reactions(&self) -> Result<Reactions> {
        Ok(Reactions::new(
            self.store.prefix_collect(REGISTERED_REACTIONS_STORE_PREFIX)?,
        ))
    }

    /// Resolves a submitted reaction to its `(shortcode, value)` pair.
    ///
    /// Known emojis resolve by grapheme or any alias to their canonical
    /// shortcode. Anything else must be registered in `subspace`.
    pub fn extract_reaction_value_and_shortcode(
        &self,
        reaction: &str,
        subspace: &str,
    ) -> Result<(String, String)> {
        if let Some(emoji) = self.emojis.find(reaction) {
            return Ok((emoji.shortcode().to_string(), emoji.value.clone()));
        }

        match self.get_registered_reaction(reaction, subspace)? {
            Some(registered) => Ok((registered.shortcode, registered.value)),
            None => Err(PostsError::not_found(format!(
                "short code {} must be registered before using it",
                strip_variation_selector(reaction)
            ))),
        }
    }

    // =========================================================================
    // Message handling
    // =========================================================================

    /// Validates and applies `msg` at `block_time` (milliseconds).
    pub fn handle(&mut self, msg: PostMsg, block_time: u64) -> Result<HandlerOutcome> {
        let msg_type = msg.msg_type();
        debug!(msg_type = %msg_type, signer = %msg.signer(), "handling message");

        let result = msg.validate_basic(&self.emojis).and_then(|_| match msg {
            PostMsg::CreatePost(msg) => self.handle_create_post(msg, block_time),
            PostMsg::EditPost(msg) => self.handle_edit_post(msg, block_time),
            PostMsg::AddPostReaction(msg) => self.handle_add_post_reaction(msg),
            PostMsg::RemovePostReaction(msg) => self.handle_remove_post_reaction(msg),
            PostMsg::AnswerPoll(msg) => self.handle_answer_poll(msg, block_time),
            PostMsg::RegisterReaction(msg) => self.handle_register_reaction(msg),
        });

        if let Err(e) = &result {
            warn!(msg_type = %msg_type, "message rejected: {}", e);
        }
        result
    }

    fn handle_create_post(&mut self, msg: MsgCreatePost, block_time: u64) -> Result<HandlerOutcome> {
        if msg.creation_date > block_time {
            return Err(PostsError::invalid_timestamp(format!(
                "creation date {} cannot be after block time {}",
                msg.creation_date, block_time
            )));
        }

        let post = Post::new(msg.to_new_post())?;
        self.params.validate_post(&post)?;

        if self.post_exists(&post.id)? {
            return Err(PostsError::conflict(format!(
                "the provided post conflicts with the one having id {}",
                post.id
            )));
        }

        if let Some(parent_id) = &post.parent_id {
            let parent = self.get_post(parent_id)?.ok_or_else(|| {
                PostsError::not_found(format!("parent post with id {} not found", parent_id))
            })?;
            if !parent.allows_comments {
                return Err(PostsError::unauthorized(format!(
                    "post with id {} does not allow comments",
                    parent.id
                )));
            }
        }

        self.save_post(&post)?;
        info!(post = %post.id.short(), creator = %post.creator, "post created");

        let event = Event::new(EVENT_TYPE_POST_CREATED)
            .attr(ATTRIBUTE_KEY_POST_ID, &post.id)
            .attr(
                ATTRIBUTE_KEY_POST_PARENT_ID,
                post.parent_id.as_ref().map(PostId::as_str).unwrap_or_default(),
            )
            .attr(ATTRIBUTE_KEY_POST_CREATION_TIME, post.created)
            .attr(ATTRIBUTE_KEY_POST_OWNER, &post.creator);
        Ok(HandlerOutcome::new(Some(post.id), event))
    }

    fn handle_edit_post(&mut self, msg: MsgEditPost, block_time: u64) -> Result<HandlerOutcome> {
        let existing = self.require_post(&msg.post_id)?;

        if msg.editor != existing.creator {
            return Err(PostsError::unauthorized("incorrect owner"));
        }

        if msg.edit_date < existing.created {
            return Err(PostsError::invalid_timestamp(
                "edit date cannot be before creation date",
            ));
        }

        if msg.edit_date > block_time {
            return Err(PostsError::invalid_timestamp(format!(
                "edit date {} cannot be after block time {}",
                msg.edit_date, block_time
            )));
        }

        let edited = existing.edit(msg.to_post_edit())?;
        self.params.validate_post(&edited)?;
        self.save_post(&edited)?;
        info!(post = %edited.id.short(), "post edited");

        let event = Event::new(EVENT_TYPE_POST_EDITED)
            .attr(ATTRIBUTE_KEY_POST_ID, &edited.id)
            .attr(ATTRIBUTE_KEY_POST_EDIT_TIME, msg.edit_date)
            .attr(ATTRIBUTE_KEY_CONTENT_HASH, &edited.content_hash);
        Ok(HandlerOutcome::new(Some(edited.id), event))
    }

    fn handle_add_post_reaction(&mut self, msg: MsgAddPostReaction) -> Result<HandlerOutcome> {
        let post = self.require_post(&msg.post_id)?;
        let (shortcode, value) =
            self.extract_reaction_value_and_shortcode(&msg.reaction, &post.subspace)?;

        let reaction = PostReaction::new(shortcode.clone(), value.clone(), msg.user.clone());
        reaction.validate(&self.emojis)?;
        self.save_post_reaction(&post.id, reaction)?;
        debug!(post = %post.id.short(), user = %msg.user, %shortcode, "reaction added");

        let event = Event::new(EVENT_TYPE_POST_REACTION_ADDED)
            .attr(ATTRIBUTE_KEY_POST_ID, &post.id)
            .attr(ATTRIBUTE_KEY_REACTION_OWNER, &msg.user)
            .attr(ATTRIBUTE_KEY_REACTION_VALUE, value)
            .attr(ATTRIBUTE_KEY_REACTION_SHORTCODE, shortcode);
        Ok(HandlerOutcome::new(None, event))
    }

    fn handle_remove_post_reaction(
        &mut self,
        msg: MsgRemovePostReaction,
    ) -> Result<HandlerOutcome> {
        let post = self.require_post(&msg.post_id)?;
        let (shortcode, value) =
            self.extract_reaction_value_and_shortcode(&msg.reaction, &post.subspace)?;

        self.remove_post_reaction(&post.id, &msg.user, &shortcode)?;
        debug!(post = %post.id.short(), user = %msg.user, %shortcode, "reaction removed");

        let event = Event::new(EVENT_TYPE_POST_REACTION_REMOVED)
            .attr(ATTRIBUTE_KEY_POST_ID, &post.id)
            .attr(ATTRIBUTE_KEY_REACTION_OWNER, &msg.user)
            .attr(ATTRIBUTE_KEY_REACTION_VALUE, value)
            .attr(ATTRIBUTE_KEY_REACTION_SHORTCODE, shortcode);
        Ok(HandlerOutcome::new(None, event))
    }

    fn handle_answer_poll(&mut self, msg: MsgAnswerPoll, block_time: u64) -> Result<HandlerOutcome> {
        let post = self.require_post(&msg.post_id)?;
        let poll = post.poll.as_ref().ok_or_else(|| {
            PostsError::not_found(format!("no poll associated with id {}", post.id))
        })?;

        if poll.is_closed_at(block_time) {
            return Err(PostsError::poll_closed(format!(
                "the poll associated with id {} was closed at {}",
                post.id, poll.end_date
            )));
        }

        if msg.answers.len() > 1 && !poll.allows_multiple_answers {
            return Err(PostsError::unauthorized(format!(
                "the poll associated with id {} doesn't allow multiple answers",
                post.id
            )));
        }

        if msg.answers.len() > poll.answers.len() {
            return Err(PostsError::exceeds_limit(
                "user's answers are more than the available ones inside the poll",
            ));
        }

        if let Some(unknown) = msg.answers.iter().find(|id| !poll.has_answer(**id)) {
            return Err(PostsError::not_found(format!(
                "answer with id {} isn't one of the poll's provided answers",
                unknown
            )));
        }

        let existing = self.get_poll_answers(&post.id)?;
        if existing.get(&msg.answerer).is_some() && !poll.allows_answer_edits {
            return Err(PostsError::unauthorized(format!(
                "post with id {} doesn't allow answers' edits",
                post.id
            )));
        }

        let answer = UserAnswer::new(msg.answerer.clone(), msg.answers);
        answer.validate()?;
        self.save_poll_answer(&post.id, answer)?;
        debug!(post = %post.id.short(), answerer = %msg.answerer, "poll answered");

        let event = Event::new(EVENT_TYPE_POLL_ANSWERED)
            .attr(ATTRIBUTE_KEY_POST_ID, &post.id)
            .attr(ATTRIBUTE_KEY_POLL_ANSWERER, &msg.answerer);
        Ok(HandlerOutcome::new(None, event))
    }

    fn handle_register_reaction(&mut self, msg: MsgRegisterReaction) -> Result<HandlerOutcome> {
        if self.emojis.is_emoji(&msg.shortcode) {
            return Err(PostsError::invalid_shortcode(format!(
                "shortcode {} represents an emoji and can't be registered",
                msg.shortcode
            )));
        }

        if self
            .get_registered_reaction(&msg.shortcode, &msg.subspace)?
            .is_some()
        {
            return Err(PostsError::conflict(format!(
                "reaction with shortcode {} and subspace {} has already been registered",
                msg.shortcode, msg.subspace
            )));
        }

        let reaction = msg.to_registered_reaction();
        self.register_reaction(&reaction)?;
        info!(shortcode = %reaction.shortcode, subspace = %reaction.subspace, "reaction registered");

        let event = Event::new(EVENT_TYPE_REACTION_REGISTERED)
            .attr(ATTRIBUTE_KEY_REACTION_CREATOR, &reaction.creator)
            .attr(ATTRIBUTE_KEY_REACTION_SHORTCODE, &reaction.shortcode)
            .attr(ATTRIBUTE_KEY_REACTION_VALUE, &reaction.value)
            .attr(ATTRIBUTE_KEY_REACTION_SUBSPACE, &reaction.subspace);
        Ok(HandlerOutcome::new(None, event))
    }

    // =========================================================================
    // Genesis support
    // =========================================================================

    pub(crate) fn import_poll_answers(&mut self, id: &PostId, answers: &UserAnswers) -> Result<()> {
        self.set_poll_answers(id, answers)
    }

    pub(crate) fn import_post_reactions(
        &mut self,
        id: &PostId,
        reactions: &PostReactions,
    ) -> Result<()> {
        self.set_post_reactions(id, reactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::posts::attachment::Attachments;
    use crate::posts::poll::{PollAnswer, PollData};
    use crate::storage::MemoryStore;

    const SUBSPACE: &str = "4e188d9c17150037d5199bbdb91ae1eb2a78a15aca04cb35530cccb81494b36e";
    const BLOCK_TIME: u64 = 1_600_000_000_000;

    fn keeper() -> Keeper<MemoryStore> {
        Keeper::new(MemoryStore::new(), Params::default(), EmojiTable::standard())
    }

    fn creator() -> Address {
        Address::from("cosmos1cjf97gpzwmaf30pzvaargfgr884mpp5ak8f7ns")
    }

    fn user() -> Address {
        Address::from("cosmos1s3nh6tafl4amaxkke9kdejhp09lk93g9ev39r4")
    }

    fn create_msg(message: &str) -> MsgCreatePost {
        MsgCreatePost {
            parent_id: None,
            message: message.to_string(),
            allows_comments: true,
            subspace: SUBSPACE.to_string(),
            optional_data: BTreeMap::new(),
            creator: creator(),
            creation_date: BLOCK_TIME - 1000,
            attachments: Attachments::default(),
            poll: None,
        }
    }

    fn create(keeper: &mut Keeper<MemoryStore>, msg: MsgCreatePost) -> PostId {
        keeper
            .handle(PostMsg::CreatePost(msg), BLOCK_TIME)
            .expect("Failed to create post")
            .post_id
            .expect("create returns the post id")
    }

    #[test]
    fn test_create_post_saves_and_emits() {
        let mut keeper = keeper();
        let outcome = keeper
            .handle(PostMsg::CreatePost(create_msg("hello")), BLOCK_TIME)
            .expect("Failed to create post");

        let id = outcome.post_id.expect("post id");
        let stored = keeper.get_post(&id).unwrap().expect("stored post");
        assert_eq!(stored.message, "hello");
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].event_type, EVENT_TYPE_POST_CREATED);
        assert_eq!(outcome.events[0].attribute(ATTRIBUTE_KEY_POST_ID), Some(id.as_str()));
    }

    #[test]
    fn test_create_post_rejects_duplicate() {
        let mut keeper = keeper();
        create(&mut keeper, create_msg("hello"));
        let err = keeper
            .handle(PostMsg::CreatePost(create_msg("hello")), BLOCK_TIME)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(keeper.get_posts().unwrap().len(), 1);
    }

    #[test]
    fn test_create_post_rejects_future_creation_date() {
        let mut keeper = keeper();
        let mut msg = create_msg("hello");
        msg.creation_date = BLOCK_TIME + 1;
        let err = keeper.handle(PostMsg::CreatePost(msg), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTimestamp);
        assert!(keeper.store().is_empty());
    }

    #[test]
    fn test_create_comment_checks_parent() {
        let mut keeper = keeper();

        let mut orphan = create_msg("comment");
        orphan.parent_id = Some(PostId::from_raw("a".repeat(64)));
        let err = keeper.handle(PostMsg::CreatePost(orphan), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let mut closed = create_msg("no comments please");
        closed.allows_comments = false;
        let parent = create(&mut keeper, closed);

        let mut comment = create_msg("comment");
        comment.parent_id = Some(parent.clone());
        let err = keeper.handle(PostMsg::CreatePost(comment), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_create_post_enforces_params() {
        let mut keeper = keeper();
        keeper
            .set_params(Params {
                max_message_length: 5,
                ..Params::default()
            })
            .unwrap();
        let err = keeper
            .handle(PostMsg::CreatePost(create_msg("too long")), BLOCK_TIME)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExceedsLimit);
    }

    #[test]
    fn test_edit_post_keeps_id() {
        let mut keeper = keeper();
        let id = create(&mut keeper, create_msg("hello"));
        let before = keeper.get_post(&id).unwrap().unwrap();

        let edit = MsgEditPost {
            post_id: id.clone(),
            message: "edited".to_string(),
            attachments: None,
            poll: None,
            editor: creator(),
            edit_date: BLOCK_TIME,
        };
        let outcome = keeper.handle(PostMsg::EditPost(edit), BLOCK_TIME).unwrap();
        assert_eq!(outcome.post_id.as_ref(), Some(&id));

        let after = keeper.get_post(&id).unwrap().unwrap();
        assert_eq!(after.message, "edited");
        assert_eq!(after.last_edited, Some(BLOCK_TIME));
        assert_ne!(after.content_hash, before.content_hash);
        assert!(after.verify_content_hash().is_ok());
    }

    #[test]
    fn test_edit_post_requires_creator() {
        let mut keeper = keeper();
        let id = create(&mut keeper, create_msg("hello"));
        let edit = MsgEditPost {
            post_id: id.clone(),
            message: "edited".to_string(),
            attachments: None,
            poll: None,
            editor: user(),
            edit_date: BLOCK_TIME,
        };
        let err = keeper.handle(PostMsg::EditPost(edit), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(keeper.get_post(&id).unwrap().unwrap().message, "hello");
    }

    #[test]
    fn test_reactions_resolve_aliases() {
        let mut keeper = keeper();
        let id = create(&mut keeper, create_msg("hello"));

        let add = |reaction: &str| {
            PostMsg::AddPostReaction(MsgAddPostReaction {
                post_id: id.clone(),
                reaction: reaction.to_string(),
                user: user(),
            })
        };

        let outcome = keeper.handle(add("👍"), BLOCK_TIME).unwrap();
        assert_eq!(
            outcome.events[0].attribute(ATTRIBUTE_KEY_REACTION_SHORTCODE),
            Some(":+1:")
        );
        let err = keeper.handle(add(":thumbsup:"), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let reactions = keeper.get_post_reactions(&id).unwrap();
        assert_eq!(
            reactions.as_slice(),
            &[PostReaction::new(":+1:", "👍", user())]
        );

        let remove = PostMsg::RemovePostReaction(MsgRemovePostReaction {
            post_id: id.clone(),
            user: user(),
            reaction: ":thumbsup:".to_string(),
        });
        keeper.handle(remove.clone(), BLOCK_TIME).unwrap();
        assert!(keeper.get_post_reactions(&id).unwrap().is_empty());

        let err = keeper.handle(remove, BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_custom_reaction_must_be_registered() {
        let mut keeper = keeper();
        let id = create(&mut keeper, create_msg("hello"));
        let add = PostMsg::AddPostReaction(MsgAddPostReaction {
            post_id: id.clone(),
            reaction: ":my_reaction:".to_string(),
            user: user(),
        });

        let err = keeper.handle(add.clone(), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let register = PostMsg::RegisterReaction(MsgRegisterReaction {
            shortcode: ":my_reaction:".to_string(),
            value: "https://smile.jpg".to_string(),
            subspace: SUBSPACE.to_string(),
            creator: creator(),
        });
        keeper.handle(register.clone(), BLOCK_TIME).unwrap();
        let err = keeper.handle(register, BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        keeper.handle(add, BLOCK_TIME).unwrap();
        assert_eq!(
            keeper.get_post_reactions(&id).unwrap().as_slice()[0].value,
            "https://smile.jpg"
        );
        assert_eq!(keeper.get_registered_reactions().unwrap().len(), 1);
    }

    fn poll_msg(allows_multiple: bool, allows_edits: bool) -> MsgCreatePost {
        let mut msg = create_msg("");
        msg.poll = Some(PollData {
            question: "poll?".to_string(),
            end_date: BLOCK_TIME + 1000,
            answers: vec![PollAnswer::new(1, "Yes"), PollAnswer::new(2, "No")],
            is_open: true,
            allows_multiple_answers: allows_multiple,
            allows_answer_edits: allows_edits,
        });
        msg
    }

    fn answer(id: &PostId, answers: &[u64]) -> PostMsg {
        PostMsg::AnswerPoll(MsgAnswerPoll {
            post_id: id.clone(),
            answers: answers.to_vec(),
            answerer: user(),
        })
    }

    #[test]
    fn test_answer_poll_replaces_previous_answer() {
        let mut keeper = keeper();
        let id = create(&mut keeper, poll_msg(true, true));

        keeper.handle(answer(&id, &[1]), BLOCK_TIME).unwrap();
        keeper.handle(answer(&id, &[1, 2]), BLOCK_TIME).unwrap();

        let answers = keeper.get_poll_answers(&id).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.as_slice()[0].answer_ids, vec![1, 2]);
    }

    #[test]
    fn test_answer_poll_rules() {
        let mut keeper = keeper();
        let id = create(&mut keeper, poll_msg(false, false));

        let err = keeper.handle(answer(&id, &[1, 2]), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = keeper.handle(answer(&id, &[3]), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = keeper
            .handle(answer(&id, &[1]), BLOCK_TIME + 1001)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PollClosed);

        keeper.handle(answer(&id, &[1]), BLOCK_TIME).unwrap();
        let err = keeper.handle(answer(&id, &[2]), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            keeper.get_poll_answers(&id).unwrap().as_slice()[0].answer_ids,
            vec![1]
        );
    }

    #[test]
    fn test_answer_poll_requires_poll() {
        let mut keeper = keeper();
        let id = create(&mut keeper, create_msg("no poll"));
        let err = keeper.handle(answer(&id, &[1]), BLOCK_TIME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_all_by_post_maps() {
        let mut keeper = keeper();
        let id = create(&mut keeper, poll_msg(false, true));
        keeper.handle(answer(&id, &[2]), BLOCK_TIME).unwrap();

        let all = keeper.get_all_poll_answers().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key(&id));
        assert!(keeper.get_all_post_reactions().unwrap().is_empty());
    }
}
