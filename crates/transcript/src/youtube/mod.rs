//! Transcript loader for YouTube videos, backed by `yt-transcript-rs`.

mod video_id;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{
    CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason,
};

use crate::{Document, TranscriptLoader};
pub use video_id::parse_video_id;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The reference is not a YouTube URL or video id.
    InvalidReference,
    /// The video is private, removed, or otherwise not playable.
    VideoUnavailable,
    /// The uploader has disabled captions.
    TranscriptsDisabled,
    /// Captions exist, but not in any requested language.
    NoTranscriptFound,
    /// YouTube refused to serve this client.
    RequestBlocked,
    /// The request could not be completed.
    Network,
    /// YouTube answered with something we could not understand.
    InvalidPayload,
}

/// Error type for [`YoutubeLoader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl From<CouldNotRetrieveTranscript> for Error {
    fn from(err: CouldNotRetrieveTranscript) -> Self {
        Self::new(kind_of(err.reason.as_ref()), format!("{err}"))
    }
}

fn kind_of(reason: Option<&CouldNotRetrieveTranscriptReason>) -> ErrorKind {
    use CouldNotRetrieveTranscriptReason as Reason;

    match reason {
        Some(Reason::InvalidVideoId { .. }) => ErrorKind::InvalidReference,
        Some(
            Reason::VideoUnavailable { .. }
            | Reason::VideoUnplayable { .. }
            | Reason::AgeRestricted { .. },
        ) => ErrorKind::VideoUnavailable,
        Some(Reason::TranscriptsDisabled { .. }) => {
            ErrorKind::TranscriptsDisabled
        }
        Some(Reason::NoTranscriptFound { .. }) => ErrorKind::NoTranscriptFound,
        Some(
            Reason::IpBlocked { .. }
            | Reason::RequestBlocked { .. }
            | Reason::FailedToCreateConsentCookie { .. },
        ) => ErrorKind::RequestBlocked,
        Some(Reason::YouTubeDataUnparsable { .. }) => ErrorKind::InvalidPayload,
        _ => ErrorKind::Network,
    }
}

/// Builder for [`YoutubeLoader`].
#[derive(Clone, Debug, Default)]
pub struct YoutubeLoaderBuilder {
    languages: Vec<String>,
    timeout: Option<Duration>,
}

impl YoutubeLoaderBuilder {
    /// Sets the preferred transcript languages, most preferred first.
    ///
    /// Defaults to English only.
    #[inline]
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a timeout for loading one transcript, disabled by default.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the loader.
    pub fn build(self) -> Result<YoutubeLoader, Error> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|err| Error::new(ErrorKind::Network, format!("{err}")))?;

        let languages = if self.languages.is_empty() {
            vec!["en".to_owned()]
        } else {
            self.languages
        };
        Ok(YoutubeLoader {
            api: Arc::new(api),
            languages,
            timeout: self.timeout,
        })
    }
}

/// Loads the transcript of a YouTube video as a single [`Document`].
///
/// Manually created captions are preferred over generated ones, and the
/// snippets are joined into one text.
#[derive(Clone)]
pub struct YoutubeLoader {
    api: Arc<YouTubeTranscriptApi>,
    languages: Vec<String>,
    timeout: Option<Duration>,
}

impl YoutubeLoader {
    /// Creates a builder.
    #[inline]
    pub fn builder() -> YoutubeLoaderBuilder {
        YoutubeLoaderBuilder::default()
    }

    /// Returns the preferred languages, most preferred first.
    #[inline]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

impl fmt::Debug for YoutubeLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeLoader")
            .field("languages", &self.languages)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TranscriptLoader for YoutubeLoader {
    type Error = Error;

    fn load(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'static
    {
        let video_id = parse_video_id(reference);
        let reference = reference.to_owned();
        let api = Arc::clone(&self.api);
        let languages = self.languages.clone();
        let timeout = self.timeout;

        async move {
            let Some(video_id) = video_id else {
                return Err(Error::new(
                    ErrorKind::InvalidReference,
                    format!("{reference:?} is not a YouTube URL or video id"),
                ));
            };
            let span = debug_span!("youtube transcript", %video_id);
            let fetch = fetch_transcript(api, video_id, languages);
            let document = match timeout {
                Some(timeout) => tokio::time::timeout(timeout, fetch)
                    .instrument(span)
                    .await
                    .map_err(|_| {
                        Error::new(ErrorKind::Network, "request timed out")
                    })??,
                None => fetch.instrument(span).await?,
            };
            Ok(vec![document])
        }
    }
}

async fn fetch_transcript(
    api: Arc<YouTubeTranscriptApi>,
    video_id: String,
    languages: Vec<String>,
) -> Result<Document, Error> {
    let languages = languages.iter().map(String::as_str).collect::<Vec<_>>();
    let transcript = api
        .fetch_transcript(&video_id, &languages, false)
        .await
        .inspect_err(|err| warn!("failed to fetch transcript: {err}"))?;
    debug!(
        language = %transcript.language_code,
        generated = transcript.is_generated,
        snippets = transcript.snippets.len(),
        "transcript fetched"
    );

    let page_content = transcript.text().trim().to_owned();
    if page_content.is_empty() {
        return Err(Error::new(
            ErrorKind::NoTranscriptFound,
            "the caption track is empty",
        ));
    }

    Ok(Document {
        page_content,
        source: video_id,
        language: Some(transcript.language_code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_languages() {
        let loader = YoutubeLoader::builder().build().unwrap();
        assert_eq!(loader.languages(), ["en".to_owned()]);

        let loader = YoutubeLoader::builder()
            .with_languages(["de", "en"])
            .build()
            .unwrap();
        assert_eq!(loader.languages(), ["de".to_owned(), "en".to_owned()]);
    }

    #[tokio::test]
    async fn test_invalid_reference_is_rejected_offline() {
        let loader = YoutubeLoader::builder().build().unwrap();
        let err = loader.load("https://vimeo.com/1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidReference);
        assert!(err.to_string().contains("vimeo.com"));
    }

    #[test]
    fn test_error_kinds() {
        use CouldNotRetrieveTranscriptReason as Reason;

        assert_eq!(
            kind_of(Some(&Reason::TranscriptsDisabled)),
            ErrorKind::TranscriptsDisabled
        );
        assert_eq!(
            kind_of(Some(&Reason::VideoUnavailable)),
            ErrorKind::VideoUnavailable
        );
        assert_eq!(
            kind_of(Some(&Reason::AgeRestricted)),
            ErrorKind::VideoUnavailable
        );
        assert_eq!(kind_of(None), ErrorKind::Network);
    }
}
