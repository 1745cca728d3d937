use serde::{Deserialize, Serialize};
use tubellm_model::{
    ModelFinishReason, ModelMessage, ModelReply, ModelRequest, ModelUsage,
};

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        stream: false,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => Message::Assistant {
            content: content.clone(),
        },
    }
}

/// Why a completion could not be turned into a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyError {
    NoChoices,
    Refused(String),
    Filtered,
}

pub fn create_reply(
    mut completion: ChatCompletion,
) -> Result<ModelReply, ReplyError> {
    if completion.choices.is_empty() {
        return Err(ReplyError::NoChoices);
    }
    let choice = completion.choices.swap_remove(0);
    let finish_reason = choice.finish_reason.as_deref().map(|reason| {
        match reason {
            "length" => ModelFinishReason::Length,
            "content_filter" => ModelFinishReason::ContentFilter,
            _ => ModelFinishReason::Stop,
        }
    });

    let content = match (choice.message.content, choice.message.refusal) {
        (Some(content), _) if !content.is_empty() => content,
        (_, Some(refusal)) => return Err(ReplyError::Refused(refusal)),
        _ if finish_reason == Some(ModelFinishReason::ContentFilter) => {
            return Err(ReplyError::Filtered);
        }
        (content, None) => content.unwrap_or_default(),
    };

    Ok(ModelReply {
        content,
        finish_reason,
        usage: completion.usage.map(|usage| ModelUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::System("You are a helpful assistant.".to_owned()),
                ModelMessage::User("Hello".to_owned()),
                ModelMessage::Assistant("Hi there.".to_owned()),
            ],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .build();
        let body = serde_json::to_value(create_request(&request, &config))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "custom",
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant." },
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi there." },
                ],
                "stream": false,
            })
        );
    }

    #[test]
    fn test_create_reply() {
        let completion: ChatCompletion = serde_json::from_str(include_str!(
            "../fixtures/chat_completion.json"
        ))
        .unwrap();
        let reply = create_reply(completion).unwrap();
        assert_eq!(reply.content, "This video says hello.");
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::Stop));
        assert_eq!(
            reply.usage,
            Some(ModelUsage {
                prompt_tokens: 42,
                completion_tokens: 6,
            })
        );
    }

    #[test]
    fn test_refusal_and_filter() {
        let refused: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "message": { "content": null, "refusal": "I can't help." },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(
            create_reply(refused).unwrap_err(),
            ReplyError::Refused("I can't help.".to_owned())
        );

        let filtered: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-2",
            "choices": [{
                "message": { "content": null },
                "finish_reason": "content_filter"
            }]
        }))
        .unwrap();
        assert_eq!(create_reply(filtered).unwrap_err(), ReplyError::Filtered);

        let empty: ChatCompletion =
            serde_json::from_value(json!({ "id": "x", "choices": [] }))
                .unwrap();
        assert_eq!(create_reply(empty).unwrap_err(), ReplyError::NoChoices);
    }
}
