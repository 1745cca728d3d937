//! Core logic of the video chat: the session record, the screen state
//! machine and the handlers that move a session from one screen to the next.
//!
//! Nothing in this crate draws anything. A front end asks [`App::screen`]
//! what to show, forwards the user's input to [`App::submit`], and calls
//! [`App::run_pending`] before every redraw.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod app;
mod connector;
pub mod conversation;
mod error;
mod model_client;
mod session;

pub use app::{App, Screen, Transition, chat, gate, intake};
pub use connector::{ConnectError, Connector};
pub use error::{Error, ErrorKind};
pub use model_client::ModelClient;
pub use session::{DEFAULT_SYSTEM_PROMPT, Session};
