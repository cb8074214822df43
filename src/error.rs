//! Error types for post validation and state handling.

use thiserror::Error;

/// Result type alias for chainposts operations.
pub type Result<T> = std::result::Result<T, PostsError>;

/// Main error type for chainposts operations.
///
/// Every validator fails fast with the first violated invariant, so each
/// variant carries a single human readable message.
#[derive(Error, Debug)]
pub enum PostsError {
    /// Post identifier is not a 64 character lowercase hex digest
    #[error("Invalid post id: {0}")]
    InvalidId(String),

    /// Account reference is empty or malformed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Attachment or reaction URI is not an absolute http(s) URL
    #[error("Invalid uri: {0}")]
    InvalidUri(String),

    /// Attachment MIME type is blank
    #[error("Empty mime type: {0}")]
    EmptyMimeType(String),

    /// Attachment tags an empty account reference
    #[error("Invalid tag address: {0}")]
    InvalidTagAddress(String),

    /// Poll question is blank
    #[error("Missing poll title: {0}")]
    MissingTitle(String),

    /// Poll end date is unset
    #[error("Invalid poll end date: {0}")]
    InvalidEndDate(String),

    /// Poll provides fewer than two answers
    #[error("Insufficient poll answers: {0}")]
    InsufficientAnswers(String),

    /// A provided poll answer is blank or duplicated
    #[error("Invalid poll answer: {0}")]
    InvalidPollAnswer(String),

    /// User answer has no answerer
    #[error("Empty answerer: {0}")]
    EmptyAnswerer(String),

    /// User answer selects no answer
    #[error("Empty answers: {0}")]
    EmptyAnswers(String),

    /// Reaction has no owner
    #[error("Empty reaction owner: {0}")]
    EmptyOwner(String),

    /// Reaction value is blank
    #[error("Empty reaction value: {0}")]
    EmptyValue(String),

    /// Reaction shortcode is neither a valid shortcode nor a known emoji
    #[error("Invalid shortcode: {0}")]
    InvalidShortCode(String),

    /// Subspace is not a 64 character hex hash
    #[error("Invalid subspace: {0}")]
    InvalidSubspace(String),

    /// Message, attachments and poll are all empty
    #[error("Empty content: {0}")]
    EmptyContent(String),

    /// Creation or edit time is unset or out of order
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A configurable limit has been exceeded
    #[error("Limit exceeded: {0}")]
    ExceedsLimit(String),

    /// Referenced post, poll or reaction does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Value conflicts with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Signer is not allowed to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Poll no longer accepts answers
    #[error("Poll closed: {0}")]
    PollClosed(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted or genesis state failed validation during replay
    #[error("Genesis error: {0}")]
    Genesis(String),
}

/// Payload-free discriminator of [`PostsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidId,
    InvalidAddress,
    InvalidUri,
    EmptyMimeType,
    InvalidTagAddress,
    MissingTitle,
    InvalidEndDate,
    InsufficientAnswers,
    InvalidPollAnswer,
    EmptyAnswerer,
    EmptyAnswers,
    EmptyOwner,
    EmptyValue,
    InvalidShortCode,
    InvalidSubspace,
    EmptyContent,
    InvalidTimestamp,
    ExceedsLimit,
    NotFound,
    Conflict,
    Unauthorized,
    PollClosed,
    Serialization,
    Storage,
    Io,
    Config,
    Genesis,
}

impl PostsError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId(_) => ErrorKind::InvalidId,
            Self::InvalidAddress(_) => ErrorKind::InvalidAddress,
            Self::InvalidUri(_) => ErrorKind::InvalidUri,
            Self::EmptyMimeType(_) => ErrorKind::EmptyMimeType,
            Self::InvalidTagAddress(_) => ErrorKind::InvalidTagAddress,
            Self::MissingTitle(_) => ErrorKind::MissingTitle,
            Self::InvalidEndDate(_) => ErrorKind::InvalidEndDate,
            Self::InsufficientAnswers(_) => ErrorKind::InsufficientAnswers,
            Self::InvalidPollAnswer(_) => ErrorKind::InvalidPollAnswer,
            Self::EmptyAnswerer(_) => ErrorKind::EmptyAnswerer,
            Self::EmptyAnswers(_) => ErrorKind::EmptyAnswers,
            Self::EmptyOwner(_) => ErrorKind::EmptyOwner,
            Self::EmptyValue(_) => ErrorKind::EmptyValue,
            Self::InvalidShortCode(_) => ErrorKind::InvalidShortCode,
            Self::InvalidSubspace(_) => ErrorKind::InvalidSubspace,
            Self::EmptyContent(_) => ErrorKind::EmptyContent,
            Self::InvalidTimestamp(_) => ErrorKind::InvalidTimestamp,
            Self::ExceedsLimit(_) => ErrorKind::ExceedsLimit,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::PollClosed(_) => ErrorKind::PollClosed,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Genesis(_) => ErrorKind::Genesis,
        }
    }

    /// Creates a new invalid id error.
    pub fn invalid_id<T: ToString>(msg: T) -> Self {
        Self::InvalidId(msg.to_string())
    }

    /// Creates a new invalid address error.
    pub fn invalid_address<T: ToString>(msg: T) -> Self {
        Self::InvalidAddress(msg.to_string())
    }

    /// Creates a new invalid uri error.
    pub fn invalid_uri<T: ToString>(msg: T) -> Self {
        Self::InvalidUri(msg.to_string())
    }

    /// Creates a new empty mime type error.
    pub fn empty_mime_type<T: ToString>(msg: T) -> Self {
        Self::EmptyMimeType(msg.to_string())
    }

    /// Creates a new invalid tag address error.
    pub fn invalid_tag_address<T: ToString>(msg: T) -> Self {
        Self::InvalidTagAddress(msg.to_string())
    }

    /// Creates a new missing title error.
    pub fn missing_title<T: ToString>(msg: T) -> Self {
        Self::MissingTitle(msg.to_string())
    }

    /// Creates a new invalid end date error.
    pub fn invalid_end_date<T: ToString>(msg: T) -> Self {
        Self::InvalidEndDate(msg.to_string())
    }

    /// Creates a new insufficient answers error.
    pub fn insufficient_answers<T: ToString>(msg: T) -> Self {
        Self::InsufficientAnswers(msg.to_string())
    }

    /// Creates a new invalid poll answer error.
    pub fn invalid_poll_answer<T: ToString>(msg: T) -> Self {
        Self::InvalidPollAnswer(msg.to_string())
    }

    /// Creates a new empty answerer error.
    pub fn empty_answerer<T: ToString>(msg: T) -> Self {
        Self::EmptyAnswerer(msg.to_string())
    }

    /// Creates a new empty answers error.
    pub fn empty_answers<T: ToString>(msg: T) -> Self {
        Self::EmptyAnswers(msg.to_string())
    }

    /// Creates a new empty owner error.
    pub fn empty_owner<T: ToString>(msg: T) -> Self {
        Self::EmptyOwner(msg.to_string())
    }

    /// Creates a new empty value error.
    pub fn empty_value<T: ToString>(msg: T) -> Self {
        Self::EmptyValue(msg.to_string())
    }

    /// Creates a new invalid shortcode error.
    pub fn invalid_shortcode<T: ToString>(msg: T) -> Self {
        Self::InvalidShortCode(msg.to_string())
    }

    /// Creates a new invalid subspace error.
    pub fn invalid_subspace<T: ToString>(msg: T) -> Self {
        Self::InvalidSubspace(msg.to_string())
    }

    /// Creates a new empty content error.
    pub fn empty_content<T: ToString>(msg: T) -> Self {
        Self::EmptyContent(msg.to_string())
    }

    /// Creates a new invalid timestamp error.
    pub fn invalid_timestamp<T: ToString>(msg: T) -> Self {
        Self::InvalidTimestamp(msg.to_string())
    }

    /// Creates a new limit error.
    pub fn exceeds_limit<T: ToString>(msg: T) -> Self {
        Self::ExceedsLimit(msg.to_string())
    }

    /// Creates a new not found error.
    pub fn not_found<T: ToString>(msg: T) -> Self {
        Self::NotFound(msg.to_string())
    }

    /// Creates a new conflict error.
    pub fn conflict<T: ToString>(msg: T) -> Self {
        Self::Conflict(msg.to_string())
    }

    /// Creates a new unauthorized error.
    pub fn unauthorized<T: ToString>(msg: T) -> Self {
        Self::Unauthorized(msg.to_string())
    }

    /// Creates a new poll closed error.
    pub fn poll_closed<T: ToString>(msg: T) -> Self {
        Self::PollClosed(msg.to_string())
    }

    /// Creates a new serialization error.
    pub fn serialization<T: ToString>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Creates a new storage error.
    pub fn storage<T: ToString>(msg: T) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Creates a new configuration error.
    pub fn config<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Creates a new genesis error.
    pub fn genesis<T: ToString>(msg: T) -> Self {
        Self::Genesis(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            PostsError::invalid_uri("ftp://x.com").kind(),
            ErrorKind::InvalidUri
        );
        assert_eq!(
            PostsError::empty_content("nothing").kind(),
            ErrorKind::EmptyContent
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(PostsError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display_includes_message() {
        let err = PostsError::missing_title("poll question cannot be blank");
        assert_eq!(
            err.to_string(),
            "Missing poll title: poll question cannot be blank"
        );
    }
}
