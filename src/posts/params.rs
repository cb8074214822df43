//! Tunable content limits.

use crate::error::{PostsError, Result};
use crate::posts::constants::{
    DEFAULT_MAX_MESSAGE_LENGTH, DEFAULT_MAX_OPTIONAL_DATA_FIELDS,
    DEFAULT_MAX_OPTIONAL_DATA_VALUE_LENGTH,
};
use crate::posts::post::Post;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable overriding `max_message_length`.
pub const ENV_MAX_MESSAGE_LENGTH: &str = "CHAINPOSTS_MAX_MESSAGE_LENGTH";
/// Environment variable overriding `max_optional_data_fields`.
pub const ENV_MAX_OPTIONAL_DATA_FIELDS: &str = "CHAINPOSTS_MAX_OPTIONAL_DATA_FIELDS";
/// Environment variable overriding `max_optional_data_value_length`.
pub const ENV_MAX_OPTIONAL_DATA_VALUE_LENGTH: &str = "CHAINPOSTS_MAX_OPTIONAL_DATA_VALUE_LENGTH";

/// Limits applied to posts on top of structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub max_message_length: usize,
    pub max_optional_data_fields: usize,
    pub max_optional_data_value_length: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            max_optional_data_fields: DEFAULT_MAX_OPTIONAL_DATA_FIELDS,
            max_optional_data_value_length: DEFAULT_MAX_OPTIONAL_DATA_VALUE_LENGTH,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max message length: {}, max optional data fields: {}, max optional data value length: {}",
            self.max_message_length, self.max_optional_data_fields, self.max_optional_data_value_length
        )
    }
}

impl Params {
    /// Reads limits from `CHAINPOSTS_*` environment variables, falling back
    /// to the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Params::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str, default: usize| -> Result<usize> {
            match lookup(name) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    PostsError::config(format!("{} must be a non-negative integer, got {:?}", name, raw))
                }),
                None => Ok(default),
            }
        };

        let params = Self {
            max_message_length: read(ENV_MAX_MESSAGE_LENGTH, defaults.max_message_length)?,
            max_optional_data_fields: read(
                ENV_MAX_OPTIONAL_DATA_FIELDS,
                defaults.max_optional_data_fields,
            )?,
            max_optional_data_value_length: read(
                ENV_MAX_OPTIONAL_DATA_VALUE_LENGTH,
                defaults.max_optional_data_value_length,
            )?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_message_length == 0 {
            return Err(PostsError::config("max message length must be positive"));
        }
        if self.max_optional_data_value_length == 0 {
            return Err(PostsError::config(
                "max optional data value length must be positive",
            ));
        }
        Ok(())
    }

    /// Checks the configured limits, then runs the full post validation.
    pub fn validate_post(&self, post: &Post) -> Result<()> {
        Validator::validate_message_length(&post.message, self.max_message_length)?;
        Validator::validate_optional_data(
            &post.optional_data,
            self.max_optional_data_fields,
            self.max_optional_data_value_length,
        )?;
        post.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::posts::post::NewPost;
    use crate::posts::types::Address;
    use std::collections::HashMap;

    fn post(message: &str) -> Post {
        Post::new(NewPost {
            message: message.to_string(),
            subspace: "4e188d9c17150037d5199bbdb91ae1eb2a78a15aca04cb35530cccb81494b36e"
                .to_string(),
            created: 1,
            creator: Address::from("cosmos1cjf97gpzwmaf30pzvaargfgr884mpp5ak8f7ns"),
            ..NewPost::default()
        })
        .expect("Failed to create post")
    }

    #[test]
    fn test_defaults() {
        let params = Params::default();
        assert_eq!(params.max_message_length, 500);
        assert_eq!(params.max_optional_data_fields, 10);
        assert_eq!(params.max_optional_data_value_length, 200);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides_and_defaults() {
        let vars: HashMap<&str, &str> = [(ENV_MAX_MESSAGE_LENGTH, "1000")].into_iter().collect();
        let params = Params::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("Failed to read params");
        assert_eq!(params.max_message_length, 1000);
        assert_eq!(params.max_optional_data_fields, 10);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = Params::from_lookup(|name| {
            (name == ENV_MAX_OPTIONAL_DATA_FIELDS).then(|| "many".to_string())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = Params::from_lookup(|name| (name == ENV_MAX_MESSAGE_LENGTH).then(|| "0".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_validate_post_limits() {
        let params = Params {
            max_message_length: 10,
            max_optional_data_fields: 1,
            max_optional_data_value_length: 5,
        };

        assert!(params.validate_post(&post("short")).is_ok());

        let err = params.validate_post(&post("this is too long")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExceedsLimit);

        let mut with_data = post("short");
        with_data.optional_data.insert("a".into(), "toolong".into());
        assert_eq!(
            params.validate_post(&with_data).unwrap_err().kind(),
            ErrorKind::ExceedsLimit
        );

        with_data.optional_data.insert("a".into(), "ok".into());
        with_data.optional_data.insert("b".into(), "ok".into());
        assert_eq!(
            params.validate_post(&with_data).unwrap_err().kind(),
            ErrorKind::ExceedsLimit
        );
    }

    #[test]
    fn test_validate_post_runs_structural_checks() {
        let err = Params::default().validate_post(&post("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyContent);
    }
}
