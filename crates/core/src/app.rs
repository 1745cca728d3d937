pub mod chat;
pub mod gate;
pub mod intake;

use tubellm_transcript::TranscriptLoader;

use crate::connector::Connector;
use crate::error::Error;
use crate::session::Session;

/// The screen a session is on.
///
/// Sessions only ever move forward through these screens, and
/// [`Screen::Conversing`] is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Waiting for the API credential.
    AwaitingCredential,
    /// Waiting for the video to summarize.
    AwaitingVideo,
    /// Chatting about the video.
    Conversing,
}

impl Screen {
    /// Computes the screen from the session alone.
    pub fn of(session: &Session) -> Self {
        if session.client().is_none() {
            Screen::AwaitingCredential
        } else if session.summary().is_none() {
            Screen::AwaitingVideo
        } else {
            Screen::Conversing
        }
    }
}

/// What a handler asks the front end to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The session changed, draw the screen again from the top.
    Rerender,
    /// Nothing changed.
    Stay,
}

/// A session together with the collaborators its handlers need.
///
/// The app owns the only mutable reference to its session, so one
/// interaction is handled at a time and every handler sees the effects of
/// the previous one.
pub struct App<C, L> {
    session: Session,
    connector: C,
    loader: L,
}

impl<C, L> App<C, L> {
    /// Returns the session.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the screen to show.
    #[inline]
    pub fn screen(&self) -> Screen {
        Screen::of(&self.session)
    }
}

impl<C: Connector, L: TranscriptLoader> App<C, L> {
    /// Creates an app with a fresh session.
    #[inline]
    pub fn new(connector: C, loader: L) -> Self {
        Self::with_session(Session::default(), connector, loader)
    }

    /// Creates an app around an existing session.
    #[inline]
    pub fn with_session(session: Session, connector: C, loader: L) -> Self {
        Self {
            session,
            connector,
            loader,
        }
    }

    /// Hands the user's input to the handler of the current screen.
    ///
    /// The caller is expected to clear its input field before calling this.
    pub async fn submit(&mut self, input: &str) -> Result<Transition, Error> {
        let screen = self.screen();
        let result = match screen {
            Screen::AwaitingCredential => {
                gate::submit(&mut self.session, input, &self.connector)
            }
            Screen::AwaitingVideo => {
                intake::submit(&mut self.session, input, &self.loader).await
            }
            Screen::Conversing => chat::submit(&mut self.session, input),
        };
        match &result {
            Ok(transition) => {
                debug!(?screen, ?transition, next = ?self.screen(), "submitted");
            }
            Err(err) => warn!(?screen, "submission failed: {err}"),
        }
        result
    }

    /// Runs the work owed to the upcoming render pass.
    ///
    /// Right now that is the reply to a pending chat turn. Front ends call
    /// this before every redraw and redraw again on [`Transition::Rerender`].
    pub async fn run_pending(&mut self) -> Result<Transition, Error> {
        if self.screen() != Screen::Conversing {
            return Ok(Transition::Stay);
        }
        chat::reply(&mut self.session).await
    }
}
