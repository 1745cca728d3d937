//! The conversation loop.

use tubellm_model::ModelMessage;

use crate::app::Transition;
use crate::error::Error;
use crate::session::Session;

/// Returns the messages to display, newest first. System instructions are
/// never shown.
#[inline]
pub fn history(session: &Session) -> impl Iterator<Item = &ModelMessage> {
    session.conversation().displayed()
}

/// Records a user turn and marks a reply as owed.
///
/// The reply itself is produced by [`reply`] on the next render pass, so the
/// user's own turn can be drawn before the model is asked. At most one reply
/// is owed at a time: while one is pending, new messages are ignored.
pub fn submit(session: &mut Session, text: &str) -> Result<Transition, Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }
    if session.is_query_pending() {
        debug!("previous question is still waiting for its reply");
        return Ok(Transition::Stay);
    }
    session.conversation_mut().push_user(text.to_owned());
    session.set_query_pending(true);
    Ok(Transition::Rerender)
}

/// Answers the pending user turn, if there is one.
///
/// The whole conversation is sent to the model. The pending flag is cleared
/// whether or not the model answers. A failed reply leaves the user turn in
/// place without an answer.
pub async fn reply(session: &mut Session) -> Result<Transition, Error> {
    if !session.is_query_pending() {
        return Ok(Transition::Stay);
    }
    let Some(client) = session.client().cloned() else {
        session.set_query_pending(false);
        return Err(Error::NotConnected);
    };

    let request = session.conversation().to_request();
    let result = client.send_request(request).await;
    session.set_query_pending(false);

    let reply = result.map_err(Error::Model)?;
    session.conversation_mut().push_assistant(reply.content);
    Ok(Transition::Rerender)
}
