//! Command implementations for the chainposts CLI.

use crate::error::{PostsError, Result};
use crate::posts::{
    export_genesis, hashtag, init_genesis, EmojiTable, GenesisState, Keeper, Params, PostMsg,
};
use crate::storage::MemoryStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Validate a genesis file without importing it
pub fn validate(genesis: &Path) -> Result<()> {
    let params = Params::from_env()?;
    let state = GenesisState::from_json_file(genesis)?;
    state.validate_with(&params, &EmojiTable::standard())?;
    println!(
        "Genesis is valid: {} posts, {} registered reactions",
        state.posts.len(),
        state.registered_reactions.len()
    );
    Ok(())
}

/// Import a genesis file into a fresh in-memory keeper
fn load(genesis: &Path) -> Result<Keeper<MemoryStore>> {
    let params = Params::from_env()?;
    info!("Starting with params: {}", params);

    let state = GenesisState::from_json_file(genesis)?;
    let mut keeper = Keeper::new(MemoryStore::new(), params, EmojiTable::standard());
    init_genesis(&mut keeper, &state)?;
    Ok(keeper)
}

fn finish(keeper: &Keeper<MemoryStore>, export: Option<&Path>) -> Result<()> {
    let state = export_genesis(keeper)?;
    println!(
        "State: {} posts, {} polls answered, {} posts with reactions, {} registered reactions",
        state.posts.len(),
        state.users_poll_answers.len(),
        state.posts_reactions.len(),
        state.registered_reactions.len()
    );

    if let Some(path) = export {
        state.write_json_file(path)?;
        println!("Exported state to {}", path.display());
    }
    Ok(())
}

/// Replay a genesis file and optionally export the resulting state
pub fn replay(genesis: &Path, export: Option<&Path>) -> Result<()> {
    let keeper = load(genesis)?;
    finish(&keeper, export)
}

/// Apply a JSON array of messages on top of a genesis file
pub fn apply(genesis: &Path, messages: &Path, block_time: u64, export: Option<&Path>) -> Result<()> {
    let mut keeper = load(genesis)?;

    let contents = fs::read_to_string(messages)?;
    let msgs: Vec<PostMsg> = serde_json::from_str(&contents).map_err(|e| {
        PostsError::serialization(format!(
            "Failed to parse messages file {}: {}",
            messages.display(),
            e
        ))
    })?;

    let mut rejected = 0usize;
    for (index, msg) in msgs.into_iter().enumerate() {
        let msg_type = msg.msg_type();
        match keeper.handle(msg, block_time) {
            Ok(outcome) => {
                for event in outcome.events {
                    let attributes: Vec<String> = event
                        .attributes
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect();
                    println!("#{} {}: {}", index, event.event_type, attributes.join(" "));
                }
            }
            Err(e) => {
                rejected += 1;
                println!("#{} {} rejected: {}", index, msg_type, e);
            }
        }
    }
    println!("{} messages rejected", rejected);

    finish(&keeper, export)
}

/// Print the hashtags of a message
pub fn hashtags(message: &str) -> Result<()> {
    for tag in hashtag::extract(message) {
        println!("{}", tag);
    }
    Ok(())
}
