//! Settings read from the environment at startup.

use std::env;
use std::time::Duration;

use tubellm_openai_model::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder,
};
use tubellm_transcript::youtube::{Error as YoutubeError, YoutubeLoader};

/// Startup configuration.
///
/// Every value is optional. The variables read are listed on
/// [`Config::from_lookup`].
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Chat-completions base URL.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// A key to offer on the credential screen.
    pub api_key: Option<String>,
    /// Preferred transcript languages, most preferred first.
    pub languages: Vec<String>,
    /// Timeout for every HTTP request.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// - `OPENAI_BASE_URL`
    /// - `OPENAI_MODEL`
    /// - `OPENAI_API_KEY`
    /// - `TUBELLM_TRANSCRIPT_LANGUAGES`, comma-separated
    /// - `TUBELLM_HTTP_TIMEOUT_SECS`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let languages = non_empty("TUBELLM_TRANSCRIPT_LANGUAGES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|lang| !lang.is_empty())
                    .map(ToOwned::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|languages| !languages.is_empty())
            .unwrap_or_else(|| vec!["en".to_owned()]);

        let timeout = non_empty("TUBELLM_HTTP_TIMEOUT_SECS").and_then(|value| {
            match value.parse::<u64>() {
                Ok(0) | Err(_) => {
                    warn!("ignoring invalid TUBELLM_HTTP_TIMEOUT_SECS: {value:?}");
                    None
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
            }
        });

        Self {
            base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            model: non_empty("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            api_key: non_empty("OPENAI_API_KEY"),
            languages,
            timeout,
        }
    }

    /// Builds the provider configuration for `api_key`.
    pub fn openai_config(&self, api_key: &str) -> OpenAIConfig {
        let mut builder = OpenAIConfigBuilder::with_api_key(api_key)
            .with_base_url(&self.base_url)
            .with_model(&self.model);
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }

    /// Builds the transcript loader.
    pub fn youtube_loader(&self) -> Result<YoutubeLoader, YoutubeError> {
        let mut builder =
            YoutubeLoader::builder().with_languages(self.languages.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<deducted>"))
            .field("languages", &self.languages)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.languages, ["en"]);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("OPENAI_MODEL", "llama3"),
            ("OPENAI_API_KEY", "sk-env"),
            ("TUBELLM_TRANSCRIPT_LANGUAGES", " de, en ,,"),
            ("TUBELLM_HTTP_TIMEOUT_SECS", "30"),
        ]);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.languages, ["de", "en"]);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let openai = config.openai_config("sk-typed");
        assert_eq!(openai.model(), "llama3");
        assert_eq!(openai.base_url(), "http://localhost:11434/v1");

        assert!(!format!("{config:?}").contains("sk-env"));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = config_from(&[
            ("OPENAI_MODEL", "  "),
            ("TUBELLM_TRANSCRIPT_LANGUAGES", ","),
            ("TUBELLM_HTTP_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.languages, ["en"]);
        assert_eq!(config.timeout, None);
    }
}
