//! Transcript loading for video references.
//!
//! The conversation core only needs "give me the text of this video", so
//! this crate defines that capability as [`TranscriptLoader`] and ships a
//! loader for YouTube. Other sources can be added by implementing the trait.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod youtube;

use std::error::Error;

use serde::{Deserialize, Serialize};

/// A loaded piece of text together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// The full text.
    pub page_content: String,
    /// Identifier of the source, e.g. a video id.
    pub source: String,
    /// Language code of the text, if known.
    pub language: Option<String>,
}

/// A type that turns a user-supplied reference into documents.
///
/// Implementations may return several documents for one reference, for
/// example a long video split into parts. Callers decide how many of them
/// they use.
pub trait TranscriptLoader: Send + Sync {
    /// The error type that may be returned by the loader.
    type Error: Error + Send + Sync + 'static;

    /// Loads the documents for `reference`.
    ///
    /// The returned future must not borrow `self`.
    fn load(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'static;
}

pub use youtube::YoutubeLoader;
