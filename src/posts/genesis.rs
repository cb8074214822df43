//! Genesis state import and export.
//!
//! Genesis data has already been committed once, so anything invalid in it
//! points at an upstream consistency bug. [`init_genesis`] validates the whole
//! state before writing and refuses to start from bad data.

use crate::error::{PostsError, Result};
use crate::posts::emoji::EmojiAliases;
use crate::posts::id::PostId;
use crate::posts::keeper::Keeper;
use crate::posts::params::Params;
use crate::posts::poll::UserAnswers;
use crate::posts::post::Post;
use crate::posts::reaction::{PostReactions, Reactions};
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Complete posts state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub users_poll_answers: BTreeMap<PostId, UserAnswers>,
    #[serde(default)]
    pub posts_reactions: BTreeMap<PostId, PostReactions>,
    #[serde(default)]
    pub registered_reactions: Reactions,
    /// Limits carried by the file. When absent, the importing keeper keeps
    /// its current params.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl GenesisState {
    /// Reads a genesis state from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            PostsError::serialization(format!(
                "Failed to parse genesis file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Writes this state as pretty-printed JSON.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PostsError::serialization(format!("Failed to serialize genesis: {}", e))
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Validates every entity and every cross reference, using the default
    /// params when the state carries none.
    pub fn validate(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        self.validate_with(&Params::default(), aliases)
    }

    /// Like [`GenesisState::validate`], with `fallback` applied when the
    /// state carries no params.
    pub fn validate_with(&self, fallback: &Params, aliases: &dyn EmojiAliases) -> Result<()> {
        let params = self.params.unwrap_or(*fallback);
        params.validate()?;

        let mut ids = BTreeSet::new();
        for post in &self.posts {
            params.validate_post(post)?;
            post.verify_content_hash()?;
            if !ids.insert(&post.id) {
                return Err(PostsError::conflict(format!(
                    "post with id {} appears more than once",
                    post.id
                )));
            }
        }

        for post in &self.posts {
            if let Some(parent_id) = &post.parent_id {
                if !ids.contains(parent_id) {
                    return Err(PostsError::not_found(format!(
                        "parent post {} of post {} not found",
                        parent_id, post.id
                    )));
                }
            }
        }

        for (post_id, answers) in &self.users_poll_answers {
            require_known(&ids, post_id, "poll answers")?;
            answers.validate()?;
        }

        for (post_id, reactions) in &self.posts_reactions {
            require_known(&ids, post_id, "reactions")?;
            reactions.validate(aliases)?;
        }

        let mut registered = BTreeSet::new();
        for reaction in self.registered_reactions.iter() {
            reaction.validate(aliases)?;
            if !registered.insert((&reaction.shortcode, &reaction.subspace)) {
                return Err(PostsError::conflict(format!(
                    "reaction {} registered more than once in subspace {}",
                    reaction.shortcode, reaction.subspace
                )));
            }
        }

        Ok(())
    }
}

fn require_known(ids: &BTreeSet<&PostId>, post_id: &PostId, what: &str) -> Result<()> {
    if !ids.contains(post_id) {
        return Err(PostsError::not_found(format!(
            "{} reference unknown post {}",
            what, post_id
        )));
    }
    Ok(())
}

/// Loads `state` into the keeper.
///
/// Nothing is written unless the whole state validates. Failures are fatal
/// and reported as `Genesis` errors.
pub fn init_genesis<S: KvStore>(keeper: &mut Keeper<S>, state: &GenesisState) -> Result<()> {
    if let Err(e) = state.validate_with(keeper.params(), keeper.emojis()) {
        error!("Invalid genesis state: {}", e);
        return Err(PostsError::genesis(e));
    }

    if let Some(params) = state.params {
        keeper.set_params(params)?;
    }

    for post in &state.posts {
        keeper.save_post(post)?;
    }
    for (post_id, answers) in &state.users_poll_answers {
        keeper.import_poll_answers(post_id, answers)?;
    }
    for (post_id, reactions) in &state.posts_reactions {
        keeper.import_post_reactions(post_id, reactions)?;
    }
    for reaction in state.registered_reactions.iter() {
        keeper.register_reaction(reaction)?;
    }

    info!(
        posts = state.posts.len(),
        poll_answers = state.users_poll_answers.len(),
        post_reactions = state.posts_reactions.len(),
        registered_reactions = state.registered_reactions.len(),
        "Genesis state imported"
    );
    Ok(())
}

/// Reads the keeper's full state.
pub fn export_genesis<S: KvStore>(keeper: &Keeper<S>) -> Result<GenesisState> {
    Ok(GenesisState {
        posts: keeper.get_posts()?,
        users_poll_answers: keeper.get_all_poll_answers()?,
        posts_reactions: keeper.get_all_post_reactions()?,
        registered_reactions: keeper.get_registered_reactions()?,
        params: Some(*keeper.params()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::posts::emoji::EmojiTable;
    use crate::posts::poll::UserAnswer;
    use crate::posts::post::NewPost;
    use crate::posts::reaction::{PostReaction, RegisteredReaction};
    use crate::posts::types::Address;
    use crate::storage::MemoryStore;

    const SUBSPACE: &str = "4e188d9c17150037d5199bbdb91ae1eb2a78a15aca04cb35530cccb81494b36e";

    fn creator() -> Address {
        Address::from("cosmos1cjf97gpzwmaf30pzvaargfgr884mpp5ak8f7ns")
    }

    fn post(message: &str) -> Post {
        Post::new(NewPost {
            message: message.to_string(),
            allows_comments: true,
            subspace: SUBSPACE.to_string(),
            created: 1_577_880_000_000,
            creator: creator(),
            ..NewPost::default()
        })
        .expect("Failed to create post")
    }

    fn state() -> GenesisState {
        let first = post("first");
        let second = post("second");
        let mut users_poll_answers = BTreeMap::new();
        users_poll_answers.insert(
            first.id.clone(),
            UserAnswers::new(vec![UserAnswer::new(creator(), vec![1])]),
        );
        let mut posts_reactions = BTreeMap::new();
        posts_reactions.insert(
            second.id.clone(),
            PostReactions::new(vec![PostReaction::new(":fire:", "🔥", creator())]),
        );
        GenesisState {
            posts: vec![first, second],
            users_poll_answers,
            posts_reactions,
            registered_reactions: Reactions::new(vec![RegisteredReaction::new(
                creator(),
                ":my_reaction:",
                "https://smile.jpg",
                SUBSPACE,
            )]),
            params: None,
        }
    }

    fn keeper() -> Keeper<MemoryStore> {
        Keeper::new(MemoryStore::new(), Params::default(), EmojiTable::standard())
    }

    #[test]
    fn test_default_state_is_valid() {
        assert!(GenesisState::default()
            .validate(&EmojiTable::standard())
            .is_ok());
    }

    #[test]
    fn test_init_then_export_round_trips() {
        let state = state();
        let mut keeper = keeper();
        init_genesis(&mut keeper, &state).expect("Failed to import genesis");

        let exported = export_genesis(&keeper).expect("Failed to export genesis");
        assert_eq!(exported.posts.len(), 2);
        assert_eq!(exported.users_poll_answers, state.users_poll_answers);
        assert_eq!(exported.posts_reactions, state.posts_reactions);
        assert_eq!(exported.registered_reactions, state.registered_reactions);
        for post in &state.posts {
            assert!(exported.posts.contains(post));
        }
    }

    fn limited_keeper(max_message_length: &str) -> Keeper<MemoryStore> {
        let max_message_length = max_message_length.to_string();
        let params = Params::from_lookup(|name| {
            (name == crate::posts::params::ENV_MAX_MESSAGE_LENGTH)
                .then(|| max_message_length.clone())
        })
        .expect("Failed to read params");
        Keeper::new(MemoryStore::new(), params, EmojiTable::standard())
    }

    #[test]
    fn test_missing_params_keep_keeper_params() {
        let state: GenesisState =
            serde_json::from_str(r#"{"posts": []}"#).expect("Failed to parse genesis");
        assert_eq!(state.params, None);

        let mut keeper = limited_keeper("5");
        init_genesis(&mut keeper, &state).expect("Failed to import genesis");
        assert_eq!(keeper.params().max_message_length, 5);
    }

    #[test]
    fn test_missing_params_validate_against_keeper_params() {
        // "second" is longer than the keeper's limit
        let mut keeper = limited_keeper("5");
        let err = init_genesis(&mut keeper, &state()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Genesis);
        assert!(keeper.store().is_empty());
    }

    #[test]
    fn test_carried_params_override_keeper_params() {
        let mut state = state();
        state.params = Some(Params {
            max_message_length: 1_000,
            ..Params::default()
        });

        let mut keeper = limited_keeper("5");
        init_genesis(&mut keeper, &state).expect("Failed to import genesis");
        assert_eq!(keeper.params().max_message_length, 1_000);
        assert_eq!(
            export_genesis(&keeper)
                .expect("Failed to export genesis")
                .params,
            state.params
        );
    }

    #[test]
    fn test_duplicate_reaction_rejected() {
        let mut state = state();
        let target = state.posts[1].id.clone();
        state.posts_reactions.insert(
            target,
            PostReactions::new(vec![
                PostReaction::new(":smile:", "😄", creator()),
                PostReaction::new(":smile:", "https://x.com/a.png", creator()),
            ]),
        );

        let mut keeper = keeper();
        let err = init_genesis(&mut keeper, &state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Genesis);
        assert!(keeper.store().is_empty());
    }

    #[test]
    fn test_invalid_post_writes_nothing() {
        let mut state = state();
        state.posts[1].created = 0;

        let mut keeper = keeper();
        let err = init_genesis(&mut keeper, &state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Genesis);
        assert!(keeper.store().is_empty());
    }

    #[test]
    fn test_tampered_post_rejected() {
        let mut state = state();
        state.posts[0].message = "rewritten".to_string();
        let err = state.validate(&EmojiTable::standard()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidId);
    }

    #[test]
    fn test_duplicate_post_rejected() {
        let mut state = state();
        let first = state.posts[0].clone();
        state.posts.push(first);
        let err = state.validate(&EmojiTable::standard()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_dangling_references_rejected() {
        let table = EmojiTable::standard();
        let unknown = PostId::from_raw("b".repeat(64));

        let mut state = state();
        state
            .users_poll_answers
            .insert(unknown.clone(), UserAnswers::default());
        assert_eq!(state.validate(&table).unwrap_err().kind(), ErrorKind::NotFound);

        let mut state = self::state();
        state
            .posts_reactions
            .insert(unknown.clone(), PostReactions::default());
        assert_eq!(state.validate(&table).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("genesis.json");

        let state = state();
        state.write_json_file(&path).expect("Failed to write genesis");
        let loaded = GenesisState::from_json_file(&path).expect("Failed to read genesis");
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = GenesisState::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
