//! Conversation-related types.

use tubellm_model::{ModelMessage, ModelRequest};

/// The append-only list of turns in a session.
///
/// The first turn is always the system instruction. Later turns can only be
/// user or assistant messages, and nothing is ever edited or removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ModelMessage>,
}

impl Conversation {
    pub(crate) fn with_system_prompt(prompt: String) -> Self {
        Self {
            turns: vec![ModelMessage::System(prompt)],
        }
    }

    /// Returns every turn, oldest first.
    #[inline]
    pub fn turns(&self) -> &[ModelMessage] {
        &self.turns
    }

    /// Returns the number of turns, including the system instruction.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always `false`, the system instruction is present from the start.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the system instruction.
    #[inline]
    pub fn system_prompt(&self) -> &str {
        self.turns[0].content()
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&ModelMessage> {
        self.turns.last()
    }

    /// Returns the turns meant for display: user and assistant messages,
    /// newest first.
    pub fn displayed(&self) -> impl Iterator<Item = &ModelMessage> {
        self.turns.iter().rev().filter(|msg| !msg.is_system())
    }

    pub(crate) fn push_user(&mut self, text: String) {
        self.turns.push(ModelMessage::User(text));
    }

    pub(crate) fn push_assistant(&mut self, text: String) {
        self.turns.push(ModelMessage::Assistant(text));
    }

    pub(crate) fn to_request(&self) -> ModelRequest {
        ModelRequest {
            messages: self.turns.clone(),
        }
    }
}
