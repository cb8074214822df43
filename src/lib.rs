//! # chainposts
//!
//! Deterministic validation and content-addressed identity for posts hosted
//! inside a replicated ledger's state machine.
//!
//! ## Features
//!
//! - **Content-Addressed Identity**: SHA3-256 over a canonical bincode encoding
//! - **Fail-Fast Validation**: one ordered pipeline over posts, attachments and polls
//! - **Alias-Aware Reactions**: shortcode and emoji forms resolve to the same reaction
//! - **Pluggable Storage**: any ordered key-value store behind the `KvStore` trait
//!
//! ## Examples
//!
//! ### Creating a Post
//!
//! ```rust,no_run
//! use chainposts::posts::{Address, NewPost, Post};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let post = Post::new(NewPost {
//!     message: "Hello #desmos".to_string(),
//!     allows_comments: true,
//!     subspace: "4e188d9c17150037d5199bbdb91ae1eb2a78a15aca04cb35530cccb81494b36e".to_string(),
//!     created: 1_577_880_000_000,
//!     creator: Address::from("cosmos1cjf97gpzwmaf30pzvaargfgr884mpp5ak8f7ns"),
//!     ..NewPost::default()
//! })?;
//! post.validate()?;
//! assert!(post.hashtags().contains("desmos"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Handling Messages
//!
//! ```rust,no_run
//! use chainposts::posts::{EmojiTable, Keeper, Params, PostMsg};
//! use chainposts::storage::MemoryStore;
//! # fn run(msg: PostMsg) -> Result<(), Box<dyn std::error::Error>> {
//! let mut keeper = Keeper::new(MemoryStore::new(), Params::default(), EmojiTable::standard());
//! let outcome = keeper.handle(msg, 1_600_000_000_000)?;
//! for event in &outcome.events {
//!     println!("{}", event.event_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod posts;
pub mod storage;
pub mod validation;

pub use error::{ErrorKind, PostsError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
