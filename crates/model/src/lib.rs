//! An abstraction layer for hosted chat models.
//!
//! This crate establishes a small protocol between the conversation core
//! and the chat-completion services it talks to, so the core never has to
//! know which vendor answers its requests.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
