use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;

use tracing::Instrument;
use tubellm_model::{
    ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};

type SendRequestResult = Result<ModelReply, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
///
/// This is the chat client handle a session stores once the credential has
/// been accepted. Cloning it is cheap and clones share the provider.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    /// Wraps a provider.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!(turns = req.messages.len(), "sending request");
                    handle_response::<P>(fut.await)
                }
                .instrument(debug_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future abandons the request.
    #[inline]
    pub async fn send_request(
        &self,
        req: ModelRequest,
    ) -> Result<ModelReply, Box<dyn ModelProviderError>> {
        (self.handler_fn)(req).await
    }
}

impl Debug for ModelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClient").finish_non_exhaustive()
    }
}

fn handle_response<P: ModelProvider + 'static>(
    reply_or_err: Result<ModelReply, P::Error>,
) -> SendRequestResult {
    match reply_or_err {
        Ok(reply) => {
            trace!(
                chars = reply.content.len(),
                finish_reason = ?reply.finish_reason,
                usage = ?reply.usage,
                "finished a request"
            );
            Ok(reply)
        }
        Err(err) => {
            error!("got an error: {err:?}");
            Err(Box::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use tubellm_model::{ErrorKind, ModelMessage};
    use tubellm_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let model_provider = TestModelProvider::default();
        model_provider.add_assistant_response_step(
            PresetResponse::with_content("How are you?"),
        );

        let model_client = ModelClient::new(model_provider.clone());

        for _ in 0..3 {
            let reply = model_client
                .send_request(ModelRequest {
                    messages: vec![ModelMessage::User("Hi".to_owned())],
                })
                .await
                .unwrap();
            assert_eq!(reply.content, "How are you?");
        }
        assert_eq!(model_provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        let model_client = ModelClient::new(model_provider);
        let err = model_client
            .send_request(ModelRequest {
                messages: vec![ModelMessage::User("Hi".to_owned())],
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }
}
