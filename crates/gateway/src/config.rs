//! Gateway configuration.

use std::env;

/// Origins allowed when `CORS_ORIGINS` is not set.
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:4200", "https://localhost:4200"];

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: env::var("CORS_ORIGINS")
                .ok()
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
        }
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:4200", "https://localhost:4200"]
        );
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://a.test, ,https://b.test "),
            vec!["http://a.test", "https://b.test"]
        );
        assert!(parse_origins(" , ").is_empty());
    }
}
