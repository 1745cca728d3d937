//! The credential gate.

use crate::app::Transition;
use crate::connector::Connector;
use crate::error::Error;
use crate::session::Session;

/// Builds the chat client from `credential` and stores it in the session.
///
/// An empty credential or a failing connector leaves the session untouched.
/// Once a client is stored it is kept; later submissions do nothing.
pub fn submit<C: Connector + ?Sized>(
    session: &mut Session,
    credential: &str,
    connector: &C,
) -> Result<Transition, Error> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(Error::EmptyCredential);
    }
    if session.client().is_some() {
        debug!("client already configured");
        return Ok(Transition::Stay);
    }

    let client = connector
        .connect(credential)
        .map_err(|err| Error::Connect(err.to_string()))?;
    session.set_client(client);
    info!("chat client configured");
    Ok(Transition::Rerender)
}
