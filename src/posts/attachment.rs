//! Media attachments carried by a post.

use crate::error::{PostsError, Result};
use crate::posts::types::Address;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};

/// A media reference, optionally tagging other accounts.
///
/// Equality is structural and compares `tags` positionally, so two
/// attachments that tag the same accounts in a different order are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub uri: String,
    pub mime_type: String,
    #[serde(default)]
    pub tags: Vec<Address>,
}

impl Attachment {
    /// Creates an attachment without tags.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            tags: Vec::new(),
        }
    }

    /// Returns a copy of this attachment with the given tags.
    pub fn with_tags(mut self, tags: Vec<Address>) -> Self {
        self.tags = tags;
        self
    }

    /// Checks the URI, MIME type and tags, in that order.
    pub fn validate(&self) -> Result<()> {
        if !Validator::is_valid_uri(&self.uri) {
            return Err(PostsError::invalid_uri(format!(
                "invalid attachment uri {:?}",
                self.uri
            )));
        }

        if self.mime_type.trim().is_empty() {
            return Err(PostsError::empty_mime_type(format!(
                "attachment {} has no mime type",
                self.uri
            )));
        }

        if let Some(index) = self.tags.iter().position(Address::is_empty) {
            return Err(PostsError::invalid_tag_address(format!(
                "attachment {} has an empty tag at position {}",
                self.uri, index
            )));
        }

        Ok(())
    }
}

/// Ordered attachment sequence of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachments(Vec<Attachment>);

impl Attachments {
    pub fn new(attachments: Vec<Attachment>) -> Self {
        Self(attachments)
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if an identical attachment is already present.
    pub fn contains(&self, attachment: &Attachment) -> bool {
        self.0.contains(attachment)
    }

    /// Appends `attachment` unless an identical one exists.
    ///
    /// Returns the resulting collection and whether it was appended.
    pub fn append_if_missing(&self, attachment: Attachment) -> (Attachments, bool) {
        if self.contains(&attachment) {
            return (self.clone(), false);
        }
        let mut appended = self.0.clone();
        appended.push(attachment);
        (Attachments(appended), true)
    }

    /// Validates every attachment, stopping at the first failure.
    pub fn validate_all(&self) -> Result<()> {
        self.0.iter().try_for_each(Attachment::validate)
    }
}

impl From<Vec<Attachment>> for Attachments {
    fn from(attachments: Vec<Attachment>) -> Self {
        Self(attachments)
    }
}

impl<'a> IntoIterator for &'a Attachments {
    type Item = &'a Attachment;
    type IntoIter = std::slice::Iter<'a, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
