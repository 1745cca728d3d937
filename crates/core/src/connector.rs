use std::error::Error as StdError;

use tubellm_model::ModelProvider;

use crate::model_client::ModelClient;

/// The error returned when a chat client cannot be built.
pub type ConnectError = Box<dyn StdError + Send + Sync>;

/// Builds a chat client from a credential.
///
/// Any `Fn(&str) -> Result<P, E>` closure returning a [`ModelProvider`]
/// is a connector, so front ends usually pass one that fills the credential
/// into their provider configuration.
pub trait Connector {
    /// Builds a client that authenticates with `credential`.
    fn connect(&self, credential: &str) -> Result<ModelClient, ConnectError>;
}

impl<F, P, E> Connector for F
where
    F: Fn(&str) -> Result<P, E>,
    P: ModelProvider + 'static,
    E: Into<ConnectError>,
{
    #[inline]
    fn connect(&self, credential: &str) -> Result<ModelClient, ConnectError> {
        let provider = self(credential).map_err(Into::into)?;
        Ok(ModelClient::new(provider))
    }
}
