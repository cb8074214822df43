//! Posts state machine: posts, polls, reactions and their identity.
//!
//! Every post is a content aggregate made of a message, media attachments
//! and an optional poll. Posts are:
//! - **Content-addressed**: stamped at creation with the SHA3-256 digest of
//!   their canonical bincode encoding
//! - **Verifiable**: a `content_hash` is recomputed on every edit so stored
//!   content can always be checked against it
//! - **Deterministic**: every validator and every replica derives the same
//!   result from the same input
//!
//! ## Data Flow
//!
//! ```text
//! PostMsg ──validate_basic──> Keeper::handle
//!                                 │
//!                                 ├── Post::new / Post::edit   (identity)
//!                                 ├── Params::validate_post    (limits + pipeline)
//!                                 └── KvStore                  (persistence)
//! ```
//!
//! Reactions resolve emoji aliases through an [`EmojiAliases`] table that the
//! caller builds once and passes in explicitly.

pub mod attachment;
pub mod constants;
pub mod emoji;
pub mod genesis;
pub mod hashtag;
pub mod id;
pub mod keeper;
pub mod msgs;
pub mod params;
pub mod poll;
mod post;
pub mod reaction;
pub mod types;

pub use attachment::{Attachment, Attachments};
pub use emoji::{Emoji, EmojiAliases, EmojiTable};
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use id::PostId;
pub use keeper::{Event, HandlerOutcome, Keeper};
pub use msgs::{
    MsgAddPostReaction, MsgAnswerPoll, MsgCreatePost, MsgEditPost, MsgRegisterReaction,
    MsgRemovePostReaction, PostMsg,
};
pub use params::Params;
pub use poll::{polls_equal, PollAnswer, PollData, UserAnswer, UserAnswers};
pub use post::{NewPost, Post, PostEdit};
pub use reaction::{PostReaction, PostReactions, Reactions, RegisteredReaction};
pub use types::{Address, MsgType};
