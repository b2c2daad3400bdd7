use crate::completion::{BridAssistant, UpstreamConfig};
use crate::constants::*;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = 3004)]
    pub port: u16,
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
    #[arg(long, default_value = OPENROUTER_BASE_URL)]
    pub base_url: String,
    #[arg(long, default_value_t = 30)]
    pub upstream_timeout_secs: u64,
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,
    #[arg(long, default_value_t = 1024 * 1024)]
    pub max_body_size: usize,
    #[arg(long, default_value = DEFAULT_REFERER)]
    pub referer: String,
    #[arg(long, default_value = DEFAULT_APP_TITLE)]
    pub app_title: String,
    #[arg(long, default_value = "logs")]
    pub log_dir: String,
}

impl Default for Args {
    fn default() -> Self {
        Self::parse_from(["bridvia-assistant"])
    }
}

impl Args {
    pub fn upstream_config(&self, api_key: Option<String>) -> UpstreamConfig {
        UpstreamConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
            referer: self.referer.clone(),
            app_title: self.app_title.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<BridAssistant>,
    pub args: Arc<Args>,
}

impl AppState {
    pub fn new(assistant: BridAssistant, args: Args) -> Self {
        Self {
            assistant: Arc::new(assistant),
            args: Arc::new(args),
        }
    }
}

/// Upstream HTTP client. Only the connect phase is bounded here; request
/// deadlines are applied per call so streams are not cut off mid-body.
pub fn build_http_client(args: &Args) -> crate::types::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(args.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()?)
}

/// Reads `OPENROUTER_API_KEY`; absent or blank selects mock mode.
pub fn api_key_from_env() -> Option<String> {
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(k) if !k.trim().is_empty() => Some(k),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::default();
        assert_eq!(args.port, 3004);
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.upstream_timeout_secs, 30);
        let cfg = args.upstream_config(None);
        assert_eq!(cfg.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "bridvia-assistant",
            "--port",
            "9000",
            "--base-url",
            "http://127.0.0.1:1/v1",
        ]);
        assert_eq!(args.port, 9000);
        assert_eq!(args.base_url, "http://127.0.0.1:1/v1");
    }
}
