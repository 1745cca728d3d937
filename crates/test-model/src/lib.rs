//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;
use tubellm_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelReply,
    ModelRequest,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

struct ScriptedStep {
    preset: PresetResponse,
    attempts: AtomicU64,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should reply to each request. A step is selected by the
/// number of assistant messages already present in the request, so the first
/// step answers a history with no replies yet, the second one answers a
/// history with one reply, and so on. If there are no enough steps in the
/// script, an error will be returned.
///
/// Clones share the script, the attempt counters and the request log.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Vec<Arc<ScriptedStep>>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends the reply for the next assistant turn.
    #[inline]
    pub fn add_assistant_response_step(&self, preset: PresetResponse) {
        let step = ScriptedStep {
            preset,
            attempts: AtomicU64::new(0),
        };
        self.script
            .lock()
            .expect("script lock poisoned")
            .push(Arc::new(step));
    }

    /// Makes every reply take `duration`, 1ms by default.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests
            .lock()
            .expect("request log lock poisoned")
            .clone()
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        self.requests
            .lock()
            .expect("request log lock poisoned")
            .push(req.clone());

        let step_idx = req
            .messages
            .iter()
            .filter(|msg| matches!(msg, ModelMessage::Assistant(_)))
            .count();
        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .get(step_idx)
            .cloned();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;

            let Some(step) = step else {
                return Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::RateLimitExceeded,
                });
            };
            let attempt = step.attempts.fetch_add(1, Ordering::Relaxed);
            if step.preset.should_fail(attempt) {
                return Err(Error {
                    message: "scripted failure",
                    kind: ErrorKind::Other,
                });
            }
            Ok(ModelReply::with_content(step.preset.content.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let provider = TestModelProvider::default();
        provider
            .add_assistant_response_step(PresetResponse::with_content("Hello!"));
        provider.add_assistant_response_step(PresetResponse::with_content(
            "Sure, let me take a look.",
        ));

        let mut req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be nice.".to_owned()),
                ModelMessage::User("Hi".to_owned()),
            ],
        };
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(reply.content, "Hello!");

        req.messages.push(ModelMessage::Assistant(reply.content));
        req.messages
            .push(ModelMessage::User("Check my todo".to_owned()));
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(reply.content, "Sure, let me take a look.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_exhausted_script() {
        let provider = TestModelProvider::default();
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
        };
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_failures_then_success() {
        let provider = TestModelProvider::default();
        provider.add_assistant_response_step(
            PresetResponse::with_content("Finally.").with_failures(1),
        );
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
        };
        assert!(provider.send_request(&req).await.is_err());
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(reply.content, "Finally.");
    }

    #[tokio::test]
    async fn test_delay() {
        let mut provider = TestModelProvider::default();
        provider.set_delay(Duration::from_millis(30));
        provider.add_assistant_response_step(PresetResponse::with_content("Hi"));
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
        };

        let started = std::time::Instant::now();
        provider.send_request(&req).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
