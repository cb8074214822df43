//! Polls attached to posts and the answers users give to them.
//!
//! A poll is a fixed-choice vote carried inside the post aggregate. Each
//! voter owns at most one [`UserAnswer`] per poll; submitting again replaces
//! the previous one in place (see [`UserAnswers::reconcile`]).

use crate::error::{PostsError, Result};
use crate::posts::constants::MIN_POLL_ANSWERS;
use crate::posts::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One selectable poll answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub answer_id: u64,
    pub text: String,
}

impl PollAnswer {
    pub fn new(answer_id: u64, text: impl Into<String>) -> Self {
        Self {
            answer_id,
            text: text.into(),
        }
    }
}

/// Poll configuration and its provided answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollData {
    pub question: String,
    /// Closing time in milliseconds; `0` means unset.
    pub end_date: u64,
    pub answers: Vec<PollAnswer>,
    pub is_open: bool,
    pub allows_multiple_answers: bool,
    pub allows_answer_edits: bool,
}

impl PollData {
    /// Checks the question, end date and answers, in that order.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(PostsError::missing_title("poll question cannot be blank"));
        }

        if self.end_date == 0 {
            return Err(PostsError::invalid_end_date("poll end date must be set"));
        }

        if self.answers.len() < MIN_POLL_ANSWERS {
            return Err(PostsError::insufficient_answers(format!(
                "poll must have at least {} answers, got {}",
                MIN_POLL_ANSWERS,
                self.answers.len()
            )));
        }

        let mut seen = BTreeSet::new();
        for answer in &self.answers {
            if answer.text.trim().is_empty() {
                return Err(PostsError::invalid_poll_answer(format!(
                    "answer {} has blank text",
                    answer.answer_id
                )));
            }
            if !seen.insert(answer.answer_id) {
                return Err(PostsError::invalid_poll_answer(format!(
                    "answer id {} is used more than once",
                    answer.answer_id
                )));
            }
        }

        Ok(())
    }

    /// Ids of the provided answers, in order.
    pub fn answer_ids(&self) -> Vec<u64> {
        self.answers.iter().map(|a| a.answer_id).collect()
    }

    /// Returns true if the poll provides an answer with `answer_id`.
    pub fn has_answer(&self, answer_id: u64) -> bool {
        self.answers.iter().any(|a| a.answer_id == answer_id)
    }

    /// A poll is closed once it has been explicitly closed or `now` is past
    /// its end date.
    pub fn is_closed_at(&self, now: u64) -> bool {
        !self.is_open || now > self.end_date
    }

    /// Returns a copy of this poll that no longer accepts answers.
    pub fn close(&self) -> PollData {
        PollData {
            is_open: false,
            ..self.clone()
        }
    }
}

/// Compares two optional polls. Two absent polls are equal.
pub fn polls_equal(a: Option<&PollData>, b: Option<&PollData>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// The answers one user selected on a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub answerer: Address,
    pub answer_ids: Vec<u64>,
}

impl UserAnswer {
    pub fn new(answerer: Address, answer_ids: Vec<u64>) -> Self {
        Self {
            answerer,
            answer_ids,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.answerer.is_empty() {
            return Err(PostsError::empty_answerer("answerer address cannot be empty"));
        }
        if self.answer_ids.is_empty() {
            return Err(PostsError::empty_answers(format!(
                "user {} provided no answers",
                self.answerer
            )));
        }
        Ok(())
    }
}

/// All answers given to one poll, at most one per answerer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAnswers(Vec<UserAnswer>);

impl UserAnswers {
    pub fn new(answers: Vec<UserAnswer>) -> Self {
        Self(answers)
    }

    pub fn as_slice(&self) -> &[UserAnswer] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserAnswer> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the answer given by `answerer`, if any.
    pub fn get(&self, answerer: &Address) -> Option<&UserAnswer> {
        self.0.iter().find(|a| &a.answerer == answerer)
    }

    /// Records `incoming`, replacing the answerer's previous entry in place.
    ///
    /// `changed` is false only when an identical entry already existed.
    pub fn reconcile(&self, incoming: UserAnswer) -> (UserAnswers, bool) {
        match self.0.iter().position(|a| a.answerer == incoming.answerer) {
            Some(index) if self.0[index] == incoming => (self.clone(), false),
            Some(index) => {
                let mut updated = self.0.clone();
                updated[index] = incoming;
                (UserAnswers(updated), true)
            }
            None => {
                let mut updated = self.0.clone();
                updated.push(incoming);
                (UserAnswers(updated), true)
            }
        }
    }

    /// Validates every entry and that no answerer appears twice.
    pub fn validate(&self) -> Result<()> {
        let mut answerers = BTreeSet::new();
        for answer in &self.0 {
            answer.validate()?;
            if !answerers.insert(&answer.answerer) {
                return Err(PostsError::conflict(format!(
                    "user {} answered more than once",
                    answer.answerer
                )));
            }
        }
        Ok(())
    }
}
