//! Server configuration for the Cabinet REST API.
//!
//! Configuration comes from command line arguments, environment
//! variables, or programmatic construction.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CABINET_PORT` | 8080 | Server port |
//! | `CABINET_HOST` | 127.0.0.1 | Host to bind |
//! | `CABINET_LOG_LEVEL` | info | Log level |
//! | `CABINET_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CABINET_ENABLE_CORS` | true | Enable CORS |
//! | `CABINET_PAGINATE_BY` | (none) | Default page size for listings |
//! | `CABINET_MAX_LIMIT` | 1000 | Maximum `_limit` a client may request |
//!
//! # Example
//!
//! ```rust
//! use cabinet_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use clap::Parser;

/// Server configuration for the Cabinet REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "cabinet")]
#[command(about = "Cabinet record server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CABINET_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CABINET_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CABINET_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "CABINET_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CABINET_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Default page size applied to listings when the client sends no
    /// `_limit`. Unset means unpaginated by default.
    #[arg(long, env = "CABINET_PAGINATE_BY")]
    pub paginate_by: Option<usize>,

    /// Maximum `_limit` a client may request.
    #[arg(long, env = "CABINET_MAX_LIMIT", default_value = "1000")]
    pub max_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            paginate_by: None,
            max_limit: 1000,
        }
    }
}

impl ServerConfig {
    /// The socket address to bind.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The effective page size for a request: the client's `_limit`
    /// capped at [`max_limit`](Self::max_limit), falling back to
    /// [`paginate_by`](Self::paginate_by).
    pub fn effective_limit(&self, requested: Option<usize>) -> Option<usize> {
        requested
            .map(|l| l.min(self.max_limit))
            .or(self.paginate_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listing_is_unpaginated() {
        let config = ServerConfig::default();
        assert_eq!(config.effective_limit(None), None);
        assert_eq!(config.effective_limit(Some(10)), Some(10));
    }

    #[test]
    fn requested_limit_is_capped() {
        let config = ServerConfig {
            max_limit: 100,
            ..Default::default()
        };
        assert_eq!(config.effective_limit(Some(5000)), Some(100));
    }

    #[test]
    fn paginate_by_applies_when_no_limit_requested() {
        let config = ServerConfig {
            paginate_by: Some(25),
            ..Default::default()
        };
        assert_eq!(config.effective_limit(None), Some(25));
        assert_eq!(config.effective_limit(Some(3)), Some(3));
    }
}
