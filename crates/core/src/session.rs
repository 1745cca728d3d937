use std::cell::OnceCell;

use crate::conversation::Conversation;
use crate::model_client::ModelClient;

/// The instruction every session starts with.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant designed \
    to summarize and answer questions about YouTube videos.";

/// The conversation record of one user session.
///
/// The chat client and the summary can each be set once and are never
/// cleared afterwards. The only field that goes back and forth is the
/// pending-query flag, which marks a user turn that still owes a reply.
#[derive(Debug)]
pub struct Session {
    conversation: Conversation,
    client: OnceCell<ModelClient>,
    summary: OnceCell<String>,
    pending_query: bool,
}

impl Session {
    /// Creates a session that starts with the given system instruction.
    pub fn with_system_prompt<S: Into<String>>(prompt: S) -> Self {
        Self {
            conversation: Conversation::with_system_prompt(prompt.into()),
            client: OnceCell::new(),
            summary: OnceCell::new(),
            pending_query: false,
        }
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the chat client, if a credential has been accepted.
    #[inline]
    pub fn client(&self) -> Option<&ModelClient> {
        self.client.get()
    }

    /// Returns the first summary of the video, once there is one.
    #[inline]
    pub fn summary(&self) -> Option<&str> {
        self.summary.get().map(String::as_str)
    }

    /// Returns `true` if a user turn is waiting for its reply.
    #[inline]
    pub fn is_query_pending(&self) -> bool {
        self.pending_query
    }

    /// Stores the client. Returns `false` and keeps the existing one if a
    /// client was already set.
    pub(crate) fn set_client(&mut self, client: ModelClient) -> bool {
        self.client.set(client).is_ok()
    }

    /// Stores the summary. Returns `false` and keeps the existing one if a
    /// summary was already set.
    pub(crate) fn set_summary(&mut self, summary: String) -> bool {
        self.summary.set(summary).is_ok()
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub(crate) fn set_query_pending(&mut self, pending: bool) {
        self.pending_query = pending;
    }
}

impl Default for Session {
    #[inline]
    fn default() -> Self {
        Self::with_system_prompt(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use tubellm_test_model::TestModelProvider;

    use super::*;

    #[test]
    fn test_fresh_session() {
        let session = Session::default();
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(
            session.conversation().system_prompt(),
            DEFAULT_SYSTEM_PROMPT
        );
        assert!(session.client().is_none());
        assert!(session.summary().is_none());
        assert!(!session.is_query_pending());
    }

    #[test]
    fn test_write_once_fields() {
        let mut session = Session::default();
        let client = ModelClient::new(TestModelProvider::default());
        assert!(session.set_client(client.clone()));
        assert!(!session.set_client(client));

        assert!(session.set_summary("first".to_owned()));
        assert!(!session.set_summary("second".to_owned()));
        assert_eq!(session.summary(), Some("first"));
    }
}
