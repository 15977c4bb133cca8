//! Server configuration from command-line flags and environment variables.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Server configuration.
///
/// Every option can also be given through the environment variable named
/// next to it.
#[derive(Debug, Clone, Parser)]
#[command(name = "doodledream-server", version, about = "DoodleDream image generation proxy")]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// API key for the upstream image generator.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Reported by the health check only.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Production frontend origin allowed by CORS, e.g. `https://doodle.example`.
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(
        long,
        env = "UPSTREAM_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub upstream_timeout_secs: u64,

    /// Generation requests allowed per client per window.
    #[arg(
        long,
        env = "RATE_LIMIT_MAX",
        default_value_t = 10,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub rate_limit_max: usize,

    /// Rate limit window in seconds.
    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rate_limit_window_secs: u64,

    /// Take the client address from `X-Forwarded-For` (only behind a
    /// trusted reverse proxy).
    #[arg(long, env = "TRUST_PROXY")]
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            openai_api_key: None,
            gemini_api_key: None,
            frontend_url: None,
            upstream_timeout_secs: 60,
            rate_limit_max: 10,
            rate_limit_window_secs: 60,
            trust_proxy: false,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The upstream API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.openai_api_key.as_deref())
    }

    pub fn has_gemini_key(&self) -> bool {
        non_blank(self.gemini_api_key.as_deref()).is_some()
    }

    pub fn frontend_origin(&self) -> Option<&str> {
        non_blank(self.frontend_url.as_deref())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
