use clap::Parser;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MAX_DURATION_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Upstream Args ---
    /// Base URL of the upstream chat service. Requests go to {base}/api/chat.
    /// Defaults to http://localhost:8000 when neither this nor NEXT_PUBLIC_API_URL is set.
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Older name for the upstream base URL, read when API_BASE_URL is unset.
    #[arg(long, env = "NEXT_PUBLIC_API_URL", hide = true)]
    pub next_public_api_url: Option<String>,

    /// Maximum duration in seconds of a single relayed exchange, streaming included.
    #[arg(long, env = "MAX_DURATION_SECS", default_value_t = DEFAULT_MAX_DURATION_SECS)]
    pub max_duration_secs: u64,

    /// Largest accepted chat request body in bytes. Larger bodies get a JSON 413.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Directory with the pre-built UI to serve for any non-API path.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    /// Deployment environment reported by the health endpoint.
    #[arg(long, env = "DEPLOY_ENV", default_value = "development")]
    pub environment: String,

    /// Deployment region reported by the health endpoint.
    #[arg(long, env = "DEPLOY_REGION", default_value = "local")]
    pub region: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// Resolved upstream base URL and the setting it came from.
    pub fn upstream_base_url(&self) -> (&str, &'static str) {
        match (&self.api_base_url, &self.next_public_api_url) {
            (Some(url), _) => (url.as_str(), "API_BASE_URL"),
            (None, Some(url)) => (url.as_str(), "NEXT_PUBLIC_API_URL"),
            (None, None) => (DEFAULT_API_BASE_URL, "default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let args = Args::try_parse_from([
            "chat-relay",
            "--api-base-url",
            "http://backend:9000",
            "--max-duration-secs",
            "5",
            "--server-addr",
            "0.0.0.0:8080",
        ]).unwrap();
        assert_eq!(args.upstream_base_url(), ("http://backend:9000", "API_BASE_URL"));
        assert_eq!(args.max_duration_secs, 5);
        assert_eq!(args.server_addr, "0.0.0.0:8080");
    }

    #[test]
    fn rejects_non_numeric_duration() {
        assert!(Args::try_parse_from(["chat-relay", "--max-duration-secs", "soon"]).is_err());
    }

    #[test]
    fn legacy_url_is_used_only_as_fallback() {
        let args = Args::try_parse_from([
            "chat-relay",
            "--next-public-api-url",
            "http://legacy:8000",
        ]).unwrap();
        assert_eq!(args.upstream_base_url(), ("http://legacy:8000", "NEXT_PUBLIC_API_URL"));

        let args = Args::try_parse_from([
            "chat-relay",
            "--next-public-api-url",
            "http://legacy:8000",
            "--api-base-url",
            "http://current:8000",
        ]).unwrap();
        assert_eq!(args.upstream_base_url(), ("http://current:8000", "API_BASE_URL"));
    }
}
