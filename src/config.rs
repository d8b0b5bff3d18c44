//! Runtime configuration for the directory service.
//!
//! Defaults are compiled in; every field can be overridden through an
//! environment variable. Unparseable overrides keep the default.

use std::path::PathBuf;

use crate::entities::SignupPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    pub server: ServerConfig,
    pub accounts: AccountsConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountsConfig {
    pub signup_policy: SignupPolicy,
}

/// Where provider records come from. `None` means the built-in directory.
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    pub providers_csv: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("DIRECTORY_HOST").filter(|h| !h.trim().is_empty()) {
            config.server.host = host.trim().to_string();
        }

        // DIRECTORY_PORT wins over the generic PORT
        let port = lookup("DIRECTORY_PORT").or_else(|| lookup("PORT"));
        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            config.server.port = port;
        }

        if let Some(strict) = lookup("DIRECTORY_STRICT_SIGNUP").and_then(|s| parse_flag(&s)) {
            config.accounts.signup_policy = if strict {
                SignupPolicy::Strict
            } else {
                SignupPolicy::Lenient
            };
        }

        if let Some(path) = lookup("DIRECTORY_SEED_CSV").filter(|p| !p.trim().is_empty()) {
            config.seed.providers_csv = Some(PathBuf::from(path.trim()));
        }

        if let Some(level) = lookup("DIRECTORY_LOG").filter(|l| !l.trim().is_empty()) {
            config.logging.level = level.trim().to_string();
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
