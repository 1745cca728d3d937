//! The transcript intake.

use tubellm_transcript::TranscriptLoader;

use crate::app::Transition;
use crate::error::Error;
use crate::session::Session;

/// Builds the user turn that asks for a summary of `transcript`.
pub fn summary_request(transcript: &str) -> String {
    format!(
        "Given the following video transcript:\n{transcript}\nSummarize the video."
    )
}

/// Loads the transcript for `reference`, asks the model for a summary and
/// records both in the session.
///
/// Once a summary exists, later submissions do nothing. Only the first
/// document returned by the loader is used. On a loader
/// failure nothing is recorded. On a model failure the summary request stays
/// in the conversation, and the session stays on the intake screen.
pub async fn submit<L: TranscriptLoader + ?Sized>(
    session: &mut Session,
    reference: &str,
    loader: &L,
) -> Result<Transition, Error> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::EmptyVideoReference);
    }
    if session.summary().is_some() {
        debug!("video already summarized");
        return Ok(Transition::Stay);
    }
    let client = session.client().cloned().ok_or(Error::NotConnected)?;

    let documents = loader
        .load(reference)
        .await
        .map_err(|err| Error::Transcript(err.to_string()))?;
    let document_count = documents.len();
    let Some(document) = documents.into_iter().next() else {
        return Err(Error::NoTranscript);
    };
    if document_count > 1 {
        warn!(
            ignored = document_count - 1,
            "using the first transcript document only"
        );
    }
    debug!(
        source = %document.source,
        chars = document.page_content.len(),
        "transcript loaded"
    );

    session
        .conversation_mut()
        .push_user(summary_request(&document.page_content));
    let request = session.conversation().to_request();
    let reply = client.send_request(request).await.map_err(Error::Model)?;

    session.conversation_mut().push_assistant(reply.content.clone());
    session.set_summary(reply.content);
    info!("summary obtained");
    Ok(Transition::Rerender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_request() {
        assert_eq!(
            summary_request("Hello world"),
            "Given the following video transcript:\nHello world\nSummarize the video."
        );
    }
}
