use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use tokio::time::sleep;
use tubellm_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelReply, ModelRequest,
};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back after a short delay.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(text) = last_user else {
                return Err(FakeModelProviderError(ErrorKind::Other));
            };
            Ok(ModelReply::with_content(format!("You said {text}")))
        }
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be brief.".to_owned()),
                ModelMessage::User("Good morning".to_owned()),
            ],
        };
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(reply.content, "You said Good morning");
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_future_outlives_provider() {
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
        };
        let fut = FakeModelProvider.send_request(&req);
        drop(req);
        assert_eq!(fut.await.unwrap().content, "You said Hi");
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            messages: vec![ModelMessage::System("Nobody asked.".to_owned())],
        };
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_message_content() {
        let msg = ModelMessage::Assistant("Sure.".to_owned());
        assert_eq!(msg.content(), "Sure.");
        assert!(!msg.is_system());
        assert!(ModelMessage::System(String::new()).is_system());
    }
}
