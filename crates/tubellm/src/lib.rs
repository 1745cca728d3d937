//! A terminal front end for chatting about YouTube videos.
//!
//! The crate wires the OpenAI-compatible provider and the YouTube loader
//! into [`tubellm_core::App`], and turns the app state into text for the
//! terminal. The `tubellm` binary is a thin input loop around it.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod render;

pub use config::Config;

/// Re-exports of [`tubellm_core`] crate.
pub mod core {
    pub use tubellm_core::*;
}
