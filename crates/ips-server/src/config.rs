//! Process configuration read from `IPS_*` environment variables.
//!
//! | Variable                 | Default                 |
//! |--------------------------|-------------------------|
//! | `IPS_SERVICE`            | `convert`               |
//! | `IPS_HOST`               | `0.0.0.0`               |
//! | `IPS_PORT`               | per service kind        |
//! | `IPS_ROUTE_PREFIX`       | none                    |
//! | `IPS_ROOM_TTL_SECS`      | `900`                   |
//! | `IPS_JOIN_CODE_TTL_SECS` | `5`                     |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default room lifetime (15 minutes).
pub const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(15 * 60);

/// Default advertised join-code lifetime and rotation period.
pub const DEFAULT_JOIN_CODE_TTL: Duration = Duration::from_secs(5);

/// Longest accepted room or join-code lifetime (7 days).
pub const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// [`MAX_TTL_SECS`] as a `Duration`. Registries clamp to it.
pub const MAX_TTL: Duration = Duration::from_secs(MAX_TTL_SECS);

/// Which service a process serves.
///
/// Every kind exposes `/healthz`; the kinds differ only in the routes
/// mounted next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Echo service on `POST /ips`.
    Convert,
    /// Echo service on `POST /ips`, historically a separate deployment.
    Converter,
    /// Room creation and join-code routes.
    Share,
    /// WebSocket signalling with rotating join codes.
    Signal,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Convert,
        ServiceKind::Converter,
        ServiceKind::Share,
        ServiceKind::Signal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Convert => "convert",
            ServiceKind::Converter => "converter",
            ServiceKind::Share => "share",
            ServiceKind::Signal => "signal",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Convert | ServiceKind::Converter => 8000,
            ServiceKind::Share => 8001,
            ServiceKind::Signal => 3000,
        }
    }

    /// Whether the kind serves the echo endpoint.
    pub fn echoes(self) -> bool {
        matches!(self, ServiceKind::Convert | ServiceKind::Converter)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownService(s.to_string()))
    }
}

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown service kind '{0}' (expected convert, converter, share or signal)")]
    UnknownService(String),

    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("route prefix must start with '/' and not end with '/': '{0}'")]
    InvalidPrefix(String),
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub kind: ServiceKind,
    pub host: String,
    pub port: u16,
    /// Optional path prefix nesting every route except `/healthz`.
    pub route_prefix: Option<String>,
    pub room_ttl: Duration,
    pub join_code_ttl: Duration,
}

impl ServerConfig {
    /// Defaults for `kind`.
    pub fn for_kind(kind: ServiceKind) -> Self {
        ServerConfig {
            kind,
            host: "0.0.0.0".to_string(),
            port: kind.default_port(),
            route_prefix: None,
            room_ttl: DEFAULT_ROOM_TTL,
            join_code_ttl: DEFAULT_JOIN_CODE_TTL,
        }
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("IPS_SERVICE") {
            Some(raw) => raw.parse()?,
            None => ServiceKind::Convert,
        };
        let mut config = ServerConfig::for_kind(kind);

        if let Some(host) = lookup("IPS_HOST") {
            config.host = host;
        }
        if let Some(raw) = lookup("IPS_PORT") {
            config.port = parse_var("IPS_PORT", &raw)?;
        }
        if let Some(raw) = lookup("IPS_ROUTE_PREFIX") {
            config.route_prefix = normalize_prefix(&raw)?;
        }
        if let Some(raw) = lookup("IPS_ROOM_TTL_SECS") {
            config.room_ttl = room_ttl_from_secs(parse_var("IPS_ROOM_TTL_SECS", &raw)?)?;
        }
        if let Some(raw) = lookup("IPS_JOIN_CODE_TTL_SECS") {
            config.join_code_ttl =
                join_code_ttl_from_secs(parse_var("IPS_JOIN_CODE_TTL_SECS", &raw)?)?;
        }

        Ok(config)
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Validates a route prefix. An empty or `/` prefix means none.
pub fn normalize_prefix(raw: &str) -> Result<Option<String>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return Ok(None);
    }
    if !trimmed.starts_with('/') || trimmed.ends_with('/') {
        return Err(ConfigError::InvalidPrefix(raw.to_string()));
    }
    Ok(Some(trimmed.to_string()))
}

/// Room lifetime, at most [`MAX_TTL_SECS`]. Zero is allowed.
pub fn room_ttl_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    bounded_ttl("IPS_ROOM_TTL_SECS", secs, 0)
}

/// Join-code lifetime, between one second and [`MAX_TTL_SECS`].
pub fn join_code_ttl_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    bounded_ttl("IPS_JOIN_CODE_TTL_SECS", secs, 1)
}

fn bounded_ttl(var: &'static str, secs: u64, min: u64) -> Result<Duration, ConfigError> {
    if (min..=MAX_TTL_SECS).contains(&secs) {
        Ok(Duration::from_secs(secs))
    } else {
        Err(ConfigError::InvalidValue {
            var,
            value: secs.to_string(),
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}
