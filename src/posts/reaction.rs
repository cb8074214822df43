//! Post reactions and subspace-registered custom reactions.

use crate::error::{PostsError, Result};
use crate::posts::emoji::EmojiAliases;
use crate::posts::types::Address;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A reaction from one account to one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReaction {
    pub shortcode: String,
    pub value: String,
    pub owner: Address,
}

impl PostReaction {
    pub fn new(shortcode: impl Into<String>, value: impl Into<String>, owner: Address) -> Self {
        Self {
            shortcode: shortcode.into(),
            value: value.into(),
            owner,
        }
    }

    /// Checks owner and value, then accepts either a well-formed shortcode
    /// or a value the alias table recognizes as an emoji.
    pub fn validate(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        if self.owner.is_empty() {
            return Err(PostsError::empty_owner("reaction owner cannot be empty"));
        }

        if self.value.trim().is_empty() {
            return Err(PostsError::empty_value(
                "reaction value cannot be empty or blank",
            ));
        }

        if !Validator::is_valid_shortcode(&self.shortcode) && !aliases.is_emoji(&self.value) {
            return Err(PostsError::invalid_shortcode(format!(
                "{:?} is not a valid shortcode and {:?} is not a known emoji",
                self.shortcode, self.value
            )));
        }

        Ok(())
    }

    fn matches_query(&self, query: &str, aliases: &dyn EmojiAliases) -> bool {
        if self.shortcode == query || self.value == query {
            return true;
        }
        match aliases.find(query) {
            Some(emoji) => emoji.has_shortcode(&self.shortcode) || emoji.matches_value(&self.value),
            None => false,
        }
    }
}

/// Ordered reactions to one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostReactions(Vec<PostReaction>);

impl PostReactions {
    pub fn new(reactions: Vec<PostReaction>) -> Self {
        Self(reactions)
    }

    pub fn as_slice(&self) -> &[PostReaction] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostReaction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends `reaction` unless an identical record already exists.
    pub fn append_if_missing(&self, reaction: PostReaction) -> (PostReactions, bool) {
        if self.0.contains(&reaction) {
            return (self.clone(), false);
        }
        let mut appended = self.0.clone();
        appended.push(reaction);
        (PostReactions(appended), true)
    }

    /// Returns true if `owner` reacted with `shortcode`, whatever the value.
    pub fn contains_reaction_from(&self, owner: &Address, shortcode: &str) -> bool {
        self.position(owner, shortcode).is_some()
    }

    /// Finds a reaction of `owner` matching `query` as either shortcode or
    /// value, resolving emoji aliases in both directions.
    ///
    /// A reaction stored as `(":+1:", "👍")` is found by `"👍"`, `":+1:"` and
    /// `":thumbsup:"` alike.
    pub fn index_of_by_user_and_value(
        &self,
        owner: &Address,
        query: &str,
        aliases: &dyn EmojiAliases,
    ) -> Option<usize> {
        self.0
            .iter()
            .position(|r| &r.owner == owner && r.matches_query(query, aliases))
    }

    /// Removes the reaction of `owner` with exactly `shortcode`.
    pub fn remove_reaction(&self, owner: &Address, shortcode: &str) -> (PostReactions, bool) {
        match self.position(owner, shortcode) {
            Some(index) => {
                let mut remaining = self.0.clone();
                remaining.remove(index);
                (PostReactions(remaining), true)
            }
            None => (self.clone(), false),
        }
    }

    /// Validates every reaction and that no owner reacted twice with the
    /// same shortcode, stopping at the first failure.
    pub fn validate(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        let mut seen = BTreeSet::new();
        for reaction in &self.0 {
            reaction.validate(aliases)?;
            if !seen.insert((&reaction.owner, reaction.shortcode.as_str())) {
                return Err(PostsError::conflict(format!(
                    "user {} reacted with {} more than once",
                    reaction.owner, reaction.shortcode
                )));
            }
        }
        Ok(())
    }

    fn position(&self, owner: &Address, shortcode: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|r| &r.owner == owner && r.shortcode == shortcode)
    }
}

/// A custom shortcode bound to an image URL inside one subspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredReaction {
    pub shortcode: String,
    pub value: String,
    pub subspace: String,
    pub creator: Address,
}

impl RegisteredReaction {
    pub fn new(
        creator: Address,
        shortcode: impl Into<String>,
        value: impl Into<String>,
        subspace: impl Into<String>,
    ) -> Self {
        Self {
            shortcode: shortcode.into(),
            value: value.into(),
            subspace: subspace.into(),
            creator,
        }
    }

    pub fn validate(&self, aliases: &dyn EmojiAliases) -> Result<()> {
        if self.creator.is_empty() {
            return Err(PostsError::invalid_address("reaction creator cannot be empty"));
        }

        if !Validator::is_valid_shortcode(&self.shortcode) {
            return Err(PostsError::invalid_shortcode(format!(
                "{:?} must only contain a-z, 0-9, - and _ and start and end with ':'",
                self.shortcode
            )));
        }

        if !Validator::is_valid_uri(&self.value) {
            return Err(PostsError::invalid_uri(format!(
                "reaction value {:?} should be a URL",
                self.value
            )));
        }

        Validator::validate_subspace(&self.subspace)?;

        if aliases.is_emoji(&self.shortcode) {
            return Err(PostsError::invalid_shortcode(format!(
                "{} is already an emoji shortcode",
                self.shortcode
            )));
        }

        Ok(())
    }

    /// Store key suffix: `<shortcode><subspace>`.
    pub fn key_suffix(&self) -> String {
        format!("{}{}", self.shortcode, self.subspace)
    }
}

/// Collection of registered reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reactions(Vec<RegisteredReaction>);

impl Reactions {
    pub fn new(reactions: Vec<RegisteredReaction>) -> Self {
        Self(reactions)
    }

    pub fn as_slice(&self) -> &[RegisteredReaction] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredReaction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn append_if_missing(&self, reaction: RegisteredReaction) -> (Reactions, bool) {
        if self.0.contains(&reaction) {
            return (self.clone(), false);
        }
        let mut appended = self.0.clone();
        appended.push(reaction);
        (Reactions(appended), true)
    }

    /// Finds the reaction registered as `shortcode` in `subspace`.
    pub fn find(&self, shortcode: &str, subspace: &str) -> Option<&RegisteredReaction> {
        self.0
            .iter()
            .find(|r| r.shortcode == shortcode && r.subspace == subspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::posts::emoji::EmojiTable;

    const SUBSPACE: &str = "4e188d9c17150037d5199bbdb91ae1eb2a78a15aca04cb35530cccb81494b36e";

    fn owner() -> Address {
        Address::from("cosmos1cjf97gpzwmaf30pzvaargfgr884mpp5ak8f7ns")
    }

    fn other() -> Address {
        Address::from("cosmos1s3nh6tafl4amaxkke9kdejhp09lk93g9ev39r4")
    }

    #[test]
    fn test_post_reaction_validate() {
        let table = EmojiTable::standard();
        assert!(PostReaction::new(":smile:", "😄", owner()).validate(&table).is_ok());
        assert!(
            PostReaction::new(":my_custom:", "https://smile.jpg", owner())
                .validate(&table)
                .is_ok()
        );

        let err = PostReaction::new(":smile:", "😄", Address::default())
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOwner);

        let err = PostReaction::new(":smile:", "  ", owner())
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);

        let err = PostReaction::new("smile", "https://smile.jpg", owner())
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidShortCode);
    }

    #[test]
    fn test_validate_rejects_repeated_owner_shortcode() {
        let table = EmojiTable::standard();
        let reactions = PostReactions::new(vec![
            PostReaction::new(":smile:", "😄", owner()),
            PostReaction::new(":smile:", "https://x.com/a.png", owner()),
        ]);
        let err = reactions.validate(&table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Same shortcode from different owners is fine
        let reactions = PostReactions::new(vec![
            PostReaction::new(":smile:", "😄", owner()),
            PostReaction::new(":smile:", "😄", other()),
        ]);
        assert!(reactions.validate(&table).is_ok());
    }

    #[test]
    fn test_bad_shortcode_accepted_for_known_emoji_value() {
        let table = EmojiTable::standard();
        let reaction = PostReaction::new("thumbs", "👍", owner());
        assert!(reaction.validate(&table).is_ok());
    }

    #[test]
    fn test_append_if_missing_allows_other_owners() {
        let reactions = PostReactions::new(vec![PostReaction::new(":smile:", "😄", owner())]);

        let (same, appended) = reactions.append_if_missing(PostReaction::new(":smile:", "😄", owner()));
        assert!(!appended);
        assert_eq!(same.len(), 1);

        let (grown, appended) = reactions.append_if_missing(PostReaction::new(":smile:", "😄", other()));
        assert!(appended);
        assert_eq!(grown.len(), 2);
    }

    #[test]
    fn test_contains_reaction_from_ignores_value() {
        let reactions = PostReactions::new(vec![PostReaction::new(":fire:", "🔥", owner())]);
        assert!(reactions.contains_reaction_from(&owner(), ":fire:"));
        assert!(!reactions.contains_reaction_from(&owner(), "🔥"));
        assert!(!reactions.contains_reaction_from(&other(), ":fire:"));
    }

    #[test]
    fn test_index_of_resolves_aliases() {
        let table = EmojiTable::standard();
        let reactions = PostReactions::new(vec![
            PostReaction::new(":fire:", "🔥", owner()),
            PostReaction::new(":+1:", "👍", owner()),
            PostReaction::new(":+1:", "👍", other()),
        ]);

        for query in ["👍", ":+1:", ":thumbsup:"] {
            assert_eq!(
                reactions.index_of_by_user_and_value(&owner(), query, &table),
                Some(1),
                "{query}"
            );
        }
        assert_eq!(reactions.index_of_by_user_and_value(&other(), "👍", &table), Some(2));
        assert_eq!(reactions.index_of_by_user_and_value(&owner(), "🔥", &table), Some(0));
        assert_eq!(reactions.index_of_by_user_and_value(&owner(), ":smile:", &table), None);
    }

    #[test]
    fn test_index_of_custom_shortcode() {
        let table = EmojiTable::standard();
        let reactions = PostReactions::new(vec![PostReaction::new(
            ":my_custom:",
            "https://smile.jpg",
            owner(),
        )]);
        assert_eq!(
            reactions.index_of_by_user_and_value(&owner(), ":my_custom:", &table),
            Some(0)
        );
        assert_eq!(
            reactions.index_of_by_user_and_value(&owner(), "https://smile.jpg", &table),
            Some(0)
        );
    }

    #[test]
    fn test_remove_reaction_exact_match_only() {
        let reactions = PostReactions::new(vec![
            PostReaction::new(":+1:", "👍", owner()),
            PostReaction::new(":fire:", "🔥", owner()),
        ]);

        let (unchanged, removed) = reactions.remove_reaction(&owner(), ":thumbsup:");
        assert!(!removed);
        assert_eq!(unchanged, reactions);

        let (remaining, removed) = reactions.remove_reaction(&owner(), ":+1:");
        assert!(removed);
        assert_eq!(
            remaining.as_slice(),
            &[PostReaction::new(":fire:", "🔥", owner())]
        );
    }

    #[test]
    fn test_registered_reaction_validate() {
        let table = EmojiTable::standard();
        let valid = RegisteredReaction::new(owner(), ":my_reaction:", "https://smile.jpg", SUBSPACE);
        assert!(valid.validate(&table).is_ok());

        let cases = [
            (
                RegisteredReaction::new(Address::default(), ":my_reaction:", "https://smile.jpg", SUBSPACE),
                ErrorKind::InvalidAddress,
            ),
            (
                RegisteredReaction::new(owner(), "my_reaction", "https://smile.jpg", SUBSPACE),
                ErrorKind::InvalidShortCode,
            ),
            (
                RegisteredReaction::new(owner(), ":my_reaction:", "smile", SUBSPACE),
                ErrorKind::InvalidUri,
            ),
            (
                RegisteredReaction::new(owner(), ":my_reaction:", "https://smile.jpg", "1234"),
                ErrorKind::InvalidSubspace,
            ),
            (
                RegisteredReaction::new(owner(), ":smile:", "https://smile.jpg", SUBSPACE),
                ErrorKind::InvalidShortCode,
            ),
        ];
        for (reaction, kind) in cases {
            assert_eq!(reaction.validate(&table).unwrap_err().kind(), kind, "{reaction:?}");
        }
    }

    #[test]
    fn test_reactions_append_and_find() {
        let reaction = RegisteredReaction::new(owner(), ":my_reaction:", "https://smile.jpg", SUBSPACE);
        let (reactions, appended) = Reactions::default().append_if_missing(reaction.clone());
        assert!(appended);
        let (reactions, appended) = reactions.append_if_missing(reaction.clone());
        assert!(!appended);
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions.find(":my_reaction:", SUBSPACE), Some(&reaction));
        assert_eq!(reaction.key_suffix(), format!(":my_reaction:{}", SUBSPACE));
    }
}
