//! Client configuration
//!
//! Loaded from the environment (after `.env`), then refined with builder
//! methods. Push channel tuning lives in [`PushConfig`].

use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_DIR: &str = ".comanda";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Client configuration
///
/// | env                    | default                 |
/// |------------------------|-------------------------|
/// | `COMANDA_BACKEND_URL`  | `http://localhost:3000` |
/// | `COMANDA_TIMEOUT_SECS` | `30`                    |
/// | `COMANDA_SESSION_DIR`  | `./.comanda`            |
/// | `COMANDA_LOG`          | `info`                  |
/// | `COMANDA_LOG_DIR`      | unset                   |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Back-end base URL, REST and push share it
    pub backend_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Where the session cookie and the cart are kept
    pub session_dir: PathBuf,
    pub log_level: String,
    /// Daily rolling log files go here when set
    pub log_dir: Option<PathBuf>,
    pub push: PushConfig,
}

impl ClientConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            log_level: DEFAULT_LOG_LEVEL.into(),
            log_dir: None,
            push: PushConfig::default(),
        }
    }

    /// Load from `COMANDA_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("COMANDA_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
        );
        config.timeout = std::env::var("COMANDA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if let Ok(dir) = std::env::var("COMANDA_SESSION_DIR") {
            config.session_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("COMANDA_LOG") {
            config.log_level = level;
        }
        config.log_dir = std::env::var("COMANDA_LOG_DIR").ok().map(PathBuf::from);
        config
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_push(mut self, push: PushConfig) -> Self {
        self.push = push;
        self
    }

    /// `ws://` / `wss://` endpoint of the socket.io server
    pub fn push_url(&self) -> ClientResult<String> {
        let rest = if let Some(rest) = self.backend_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.backend_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(ClientError::Config(format!(
                "backend URL must start with http:// or https://: {}",
                self.backend_url
            )));
        };
        Ok(format!("{rest}/socket.io/?EIO=4&transport=websocket"))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

/// Push channel configuration
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Reconnect after the connection drops
    pub auto_reconnect: bool,
    /// First reconnect delay
    pub reconnect_delay: Duration,
    /// Exponential backoff cap
    pub max_reconnect_delay: Duration,
    /// Reconnect attempts before giving up (0 = unlimited)
    pub max_reconnect_attempts: u32,
    /// Handshake timeout
    pub connect_timeout: Duration,
    /// Notification buffer per subscriber
    pub channel_capacity: usize,
}

impl Default for PushConfig {
    /// LAN profile: fast recovery
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_delay: Duration::from_millis(500),
            max_reconnect_delay: Duration::from_secs(10),
            max_reconnect_attempts: 20,
            connect_timeout: Duration::from_secs(5),
            channel_capacity: 256,
        }
    }
}

impl PushConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lan() -> Self {
        Self::default()
    }

    /// Hosted back-end: tolerate latency, back off longer
    pub fn wan() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
            max_reconnect_attempts: 20,
            connect_timeout: Duration::from_secs(15),
            channel_capacity: 256,
        }
    }

    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    pub fn with_reconnect_delay(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_delay = initial;
        self.max_reconnect_delay = max;
        self
    }

    /// 0 means unlimited
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Delay before reconnect attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.reconnect_delay
            .saturating_mul(factor)
            .min(self.max_reconnect_delay)
    }

    /// Whether another reconnect attempt is allowed
    pub fn may_retry(&self, attempt: u32) -> bool {
        self.auto_reconnect
            && (self.max_reconnect_attempts == 0 || attempt <= self.max_reconnect_attempts)
    }
}
