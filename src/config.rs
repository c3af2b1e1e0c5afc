use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";


/// Launch options for the relay. Every flag falls back to an environment
/// variable, then to the built-in default.
#[derive(Clone, Debug, PartialEq, Parser)]
#[command(name = "chat-relay")]
#[command(about = "Relays chat prompts to a local Ollama server and streams the reply as SSE")]
pub struct RelayConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "CHAT_RELAY_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Streaming generate endpoint of the inference server
    #[arg(long, env = "CHAT_RELAY_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Model used when a request does not name one
    #[arg(long, env = "CHAT_RELAY_DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Connect timeout for the inference server, in seconds
    #[arg(long, env = "CHAT_RELAY_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,

    /// Send SSE keep-alive comments at this interval, in seconds
    #[arg(long, env = "CHAT_RELAY_KEEP_ALIVE_SECS")]
    pub keep_alive_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            connect_timeout_secs: None,
            keep_alive_secs: None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_matches_constant() {
        let config = RelayConfig::default();
        assert_eq!(config.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(config.default_model, "llama3.2:latest");
        assert!(config.keep_alive_secs.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let config = RelayConfig::try_parse_from([
            "chat-relay",
            "--listen",
            "0.0.0.0:8080",
            "--backend-url",
            "http://gpu-box:11434/api/generate",
            "--default-model",
            "mistral:7b",
            "--connect-timeout-secs",
            "3",
            "--keep-alive-secs",
            "15",
        ])
        .unwrap();

        assert_eq!(config.listen, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.backend_url, "http://gpu-box:11434/api/generate");
        assert_eq!(config.default_model, "mistral:7b");
        assert_eq!(config.connect_timeout_secs, Some(3));
        assert_eq!(config.keep_alive_secs, Some(15));
    }

    #[test]
    fn test_rejects_bad_listen_address() {
        assert!(RelayConfig::try_parse_from(["chat-relay", "--listen", "nowhere"]).is_err());
    }
}
