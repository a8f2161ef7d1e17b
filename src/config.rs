//! Environment-backed configuration, loaded once at startup.
//!
//! All keys are read from `TODOLIST_`-prefixed environment variables
//! (optionally via a `.env` file loaded in `main`), with serde defaults
//! for everything that can have one.

use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::sync::LazyLock;

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid TODOLIST_* configuration"));

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    /// Secret the private cookie key is derived from; must be at least
    /// 32 bytes. When unset a random key is generated and sessions do
    /// not survive a restart.
    #[serde(default)]
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` attribute on the session cookie, for plain-HTTP
    /// deployments behind no TLS terminator.
    #[serde(default)]
    pub insecure_cookie: bool,
}

fn default_database_url() -> String {
    "sqlite:todolist.sqlite".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: default_bind_addr(),
            loglevel: default_loglevel(),
            cookie_secret: None,
            insecure_cookie: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::prefixed("TODOLIST_"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        let cfg = Config::default();
        assert_eq!(cfg.database_url, "sqlite:todolist.sqlite");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
        assert_eq!(cfg.loglevel, "info");
        assert!(cfg.cookie_secret.is_none());
        assert!(!cfg.insecure_cookie);
    }
}
