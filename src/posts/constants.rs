//! Shared constants for post validation, storage and events.
//!
//! These constants are used by the message layer, the keeper and genesis
//! replay so that every replica applies the same limits and key layout.

// =============================================================================
// Content Limits (defaults for `Params`)
// =============================================================================

/// Default maximum post message length (500 bytes).
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 500;

/// Default maximum number of optional data entries per post.
pub const DEFAULT_MAX_OPTIONAL_DATA_FIELDS: usize = 10;

/// Default maximum length of a single optional data value (200 bytes).
pub const DEFAULT_MAX_OPTIONAL_DATA_VALUE_LENGTH: usize = 200;

/// Minimum number of answers a poll must provide.
pub const MIN_POLL_ANSWERS: usize = 2;

// =============================================================================
// Store Key Prefixes
// =============================================================================

/// Prefix for serialized posts: `post:<id>`.
pub const POST_STORE_PREFIX: &[u8] = b"post:";

/// Prefix for a post's poll answers: `poll_answers:<id>`.
pub const POLL_ANSWERS_STORE_PREFIX: &[u8] = b"poll_answers:";

/// Prefix for a post's reactions: `p_reactions:<id>`.
pub const POST_REACTIONS_STORE_PREFIX: &[u8] = b"p_reactions:";

/// Prefix for registered reactions: `reactions:<shortcode><subspace>`.
pub const REGISTERED_REACTIONS_STORE_PREFIX: &[u8] = b"reactions:";

// =============================================================================
// Events
// =============================================================================

pub const EVENT_TYPE_POST_CREATED: &str = "post_created";
pub const EVENT_TYPE_POST_EDITED: &str = "post_edited";
pub const EVENT_TYPE_POST_REACTION_ADDED: &str = "post_reaction_added";
pub const EVENT_TYPE_POST_REACTION_REMOVED: &str = "post_reaction_removed";
pub const EVENT_TYPE_POLL_ANSWERED: &str = "poll_answered";
pub const EVENT_TYPE_REACTION_REGISTERED: &str = "reaction_registered";

pub const ATTRIBUTE_KEY_POST_ID: &str = "post_id";
pub const ATTRIBUTE_KEY_POST_PARENT_ID: &str = "post_parent_id";
pub const ATTRIBUTE_KEY_POST_CREATION_TIME: &str = "creation_time";
pub const ATTRIBUTE_KEY_POST_EDIT_TIME: &str = "edit_time";
pub const ATTRIBUTE_KEY_POST_OWNER: &str = "owner";
pub const ATTRIBUTE_KEY_CONTENT_HASH: &str = "content_hash";
pub const ATTRIBUTE_KEY_REACTION_OWNER: &str = "user";
pub const ATTRIBUTE_KEY_REACTION_VALUE: &str = "reaction";
pub const ATTRIBUTE_KEY_REACTION_SHORTCODE: &str = "shortcode";
pub const ATTRIBUTE_KEY_REACTION_CREATOR: &str = "creator";
pub const ATTRIBUTE_KEY_REACTION_SUBSPACE: &str = "subspace";
pub const ATTRIBUTE_KEY_POLL_ANSWERER: &str = "answerer";
