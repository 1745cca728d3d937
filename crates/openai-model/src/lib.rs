//! A model provider for OpenAI-compatible chat-completion APIs.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tubellm_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder,
};
use proto::{ApiErrorBody, ChatCompletion, ReplyError};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let kind = match status {
            StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ErrorKind::Unauthorized
            }
            _ => ErrorKind::Other,
        };
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| body.trim().to_owned());
        let message = if detail.is_empty() {
            format!("server responded with {status}")
        } else {
            format!("server responded with {status}: {detail}")
        };
        Self::new(message, kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ReplyError> for Error {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::NoChoices => {
                Error::new("response contains no choices", ErrorKind::Other)
            }
            ReplyError::Refused(refusal) => {
                Error::new(format!("model refused: {refusal}"), ErrorKind::Moderated)
            }
            ReplyError::Filtered => Error::new(
                "reply was withheld by the content filter",
                ErrorKind::Moderated,
            ),
        }
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    ///
    /// No request is made here. This fails when the API key cannot be sent
    /// as an HTTP header or when the HTTP client cannot be initialized.
    pub fn new(config: OpenAIConfig) -> Result<Self, Error> {
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| {
                    Error::new(
                        "API key contains characters that are not allowed",
                        ErrorKind::Unauthorized,
                    )
                })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

        debug!(model = %config.model, base_url = %config.base_url, "provider ready");
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req, &self.config);
        trace!("sending request: {openai_req:?}");
        let resp_fut = self
            .client
            .post(self.config.completions_url())
            .json(&openai_req)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                warn!(%status, "chat completion rejected");
                return Err(Error::from_status(status, &body));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| {
                    m.type_() == mime::APPLICATION && m.subtype() == mime::JSON
                })
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let body = resp
                .text()
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
            let completion = serde_json::from_str::<ChatCompletion>(&body)
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
            trace!(id = %completion.id, "got completion");

            Ok(proto::create_reply(completion)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsendable_key() {
        let config = OpenAIConfigBuilder::with_api_key("sk-bad\nkey").build();
        let err = OpenAIProvider::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_accepts_plain_key() {
        let config = OpenAIConfigBuilder::with_api_key("sk-test").build();
        let provider = OpenAIProvider::new(config).unwrap();
        assert_eq!(provider.config().model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error":{"message":"Incorrect API key provided."}}"#;
        let err = Error::from_status(StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.message().contains("Incorrect API key provided."));

        let err = Error::from_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);

        let err = Error::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.message().ends_with("upstream down"));
    }

    #[test]
    fn test_reply_error_kinds() {
        let err = Error::from(ReplyError::Refused("no".to_owned()));
        assert_eq!(err.kind(), ErrorKind::Moderated);
        assert_eq!(Error::from(ReplyError::NoChoices).kind(), ErrorKind::Other);
    }
}
