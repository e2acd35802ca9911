use std::time::Duration;

use url::Url;

use crate::cli::{ Args, DEFAULT_API_BASE_URL, DEFAULT_MAX_DURATION_SECS };
use crate::error::RelayError;

/// Process-wide relay settings, resolved once at startup and handed to
/// [`crate::relay::Relay::new`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base_url: Url,
    pub max_duration: Duration,
}

impl RelayConfig {
    pub fn new(base_url: &str, max_duration: Duration) -> Result<Self, RelayError> {
        let base_url = Url::parse(base_url).map_err(|e|
            RelayError::Config(format!("invalid upstream base URL '{}': {}", base_url, e))
        )?;

        match base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(
                    RelayError::Config(format!("unsupported upstream URL scheme '{}'", other))
                );
            }
        }

        if max_duration.is_zero() {
            return Err(RelayError::Config("maximum duration must be greater than zero".into()));
        }

        Ok(Self { base_url, max_duration })
    }

    pub fn from_args(args: &Args) -> Result<Self, RelayError> {
        let (base_url, _) = args.upstream_base_url();
        Self::new(base_url, Duration::from_secs(args.max_duration_secs))
    }

    pub fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.as_str().trim_end_matches('/'))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            max_duration: Duration::from_secs(DEFAULT_MAX_DURATION_SECS),
        }
    }
}
