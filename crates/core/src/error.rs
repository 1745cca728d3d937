use std::fmt::{self, Display};

use tubellm_model::ModelProviderError;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input was empty. Nothing was changed.
    Validation,
    /// An external service failed.
    Collaborator,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation error"),
            ErrorKind::Collaborator => write!(f, "Collaborator error"),
        }
    }
}

/// An error reported back to the user. The session stays on its screen.
#[derive(Debug)]
pub enum Error {
    /// The credential was empty.
    EmptyCredential,
    /// The video reference was empty.
    EmptyVideoReference,
    /// The chat message was empty.
    EmptyMessage,
    /// A handler that needs the chat client ran before it was set.
    NotConnected,
    /// The chat client could not be built from the credential.
    Connect(String),
    /// The transcript could not be loaded.
    Transcript(String),
    /// The transcript loader succeeded but returned nothing.
    NoTranscript,
    /// The chat completion failed.
    Model(Box<dyn ModelProviderError>),
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCredential
            | Error::EmptyVideoReference
            | Error::EmptyMessage => ErrorKind::Validation,
            Error::NotConnected
            | Error::Connect(_)
            | Error::Transcript(_)
            | Error::NoTranscript
            | Error::Model(_) => ErrorKind::Collaborator,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyCredential => write!(f, "API key cannot be empty"),
            Error::EmptyVideoReference => {
                write!(f, "Please enter a valid YouTube URL.")
            }
            Error::EmptyMessage => {
                write!(f, "You cannot ask an empty question.")
            }
            Error::NotConnected => {
                write!(f, "An error occurred: no chat client configured.")
            }
            Error::Connect(reason) | Error::Transcript(reason) => {
                write!(f, "An error occurred: {reason}.")
            }
            Error::NoTranscript => {
                write!(f, "An error occurred: no transcript available.")
            }
            Error::Model(err) => write!(f, "An error occurred: {err}."),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Error::EmptyCredential.to_string(), "API key cannot be empty");
        assert_eq!(Error::EmptyMessage.kind(), ErrorKind::Validation);

        let err = Error::Transcript("video unavailable".to_owned());
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(err.to_string(), "An error occurred: video unavailable.");
    }
}
