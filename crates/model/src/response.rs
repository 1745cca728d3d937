use serde::{Deserialize, Serialize};

/// The reason why a model reply has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The reply was cut off by the token limit.
    Length,
    /// The reply was withheld by a content filter.
    ContentFilter,
}

/// Token accounting reported by the provider.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ModelUsage {
    /// Tokens consumed by the input messages.
    pub prompt_tokens: u64,
    /// Tokens generated for the reply.
    pub completion_tokens: u64,
}

/// A complete reply from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelReply {
    /// The reply text.
    pub content: String,
    /// Why the model stopped, if the provider told us.
    pub finish_reason: Option<ModelFinishReason>,
    /// Token usage, if the provider reported it.
    pub usage: Option<ModelUsage>,
}

impl ModelReply {
    /// Creates a reply that carries only text.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(ModelFinishReason::Stop),
            usage: None,
        }
    }
}
