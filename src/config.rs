//! Process settings read from the environment (call `dotenvy::dotenv()` first to pick up `.env`).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Development mode lifts the token requirement on `/init-db`.
    pub dev_mode: bool,
    pub init_db_token: Option<String>,
    pub max_connections: u32,
    /// Create tables at startup instead of waiting for `/init-db`.
    pub auto_init_db: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build settings from an explicit variable map. `from_env` delegates here.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|s| s.trim()).filter(|s| !s.is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url.to_string(),
            None => match (get("DB_USER"), get("DB_PASS"), get("DB_HOST"), get("DB_NAME")) {
                (Some(user), Some(pass), Some(host), Some(name)) => {
                    format!(
                        "postgres://{}:{}@{}/{}",
                        encode_userinfo(user),
                        encode_userinfo(pass),
                        host,
                        name
                    )
                }
                _ => return Err(ConfigError::Missing("DATABASE_URL")),
            },
        };

        let bind_raw = get("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.to_string(),
        })?;

        let dev_env = get("APP_ENV")
            .map(|s| matches!(s.to_lowercase().as_str(), "development" | "dev"))
            .unwrap_or(false);
        let debug = match get("DEBUG") {
            Some(v) => parse_bool("DEBUG", v)?,
            None => false,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "DB_MAX_CONNECTIONS",
                    value: v.to_string(),
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let auto_init_db = match get("AUTO_INIT_DB") {
            Some(v) => parse_bool("AUTO_INIT_DB", v)?,
            None => false,
        };

        Ok(Settings {
            database_url,
            bind_addr,
            dev_mode: dev_env || debug,
            init_db_token: get("INIT_DB_TOKEN").map(str::to_string),
            max_connections,
            auto_init_db,
        })
    }
}

/// Percent-encode a URL user or password so `@`, `:` and `/` survive.
fn encode_userinfo(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_with_database_url() {
        let s = Settings::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/shop")])).unwrap();
        assert_eq!(s.database_url, "postgres://localhost/shop");
        assert_eq!(s.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert!(!s.dev_mode);
        assert_eq!(s.init_db_token, None);
        assert_eq!(s.max_connections, 5);
        assert!(!s.auto_init_db);
    }

    #[test]
    fn url_assembled_from_parts() {
        let s = Settings::from_vars(vars(&[
            ("DB_USER", "root"),
            ("DB_PASS", "secret"),
            ("DB_HOST", "db:5432"),
            ("DB_NAME", "ecommerce_api"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "postgres://root:secret@db:5432/ecommerce_api");
    }

    #[test]
    fn url_parts_are_percent_encoded() {
        let s = Settings::from_vars(vars(&[
            ("DB_USER", "shop admin"),
            ("DB_PASS", "p@ss:w/rd"),
            ("DB_HOST", "db:5432"),
            ("DB_NAME", "ecommerce_api"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "postgres://shop%20admin:p%40ss%3Aw%2Frd@db:5432/ecommerce_api");
        let opts: sqlx::postgres::PgConnectOptions = s.database_url.parse().unwrap();
        assert_eq!(opts.get_username(), "shop admin");
        assert_eq!(opts.get_database(), Some("ecommerce_api"));
    }

    #[test]
    fn missing_database_is_an_error() {
        let err = Settings::from_vars(vars(&[("DB_USER", "root")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn dev_mode_from_app_env_or_debug() {
        let base = ("DATABASE_URL", "postgres://localhost/shop");
        assert!(Settings::from_vars(vars(&[base, ("APP_ENV", "Development")])).unwrap().dev_mode);
        assert!(Settings::from_vars(vars(&[base, ("DEBUG", "1")])).unwrap().dev_mode);
        assert!(!Settings::from_vars(vars(&[base, ("APP_ENV", "production")])).unwrap().dev_mode);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = ("DATABASE_URL", "postgres://localhost/shop");
        assert!(Settings::from_vars(vars(&[base, ("BIND_ADDR", "nowhere")])).is_err());
        assert!(Settings::from_vars(vars(&[base, ("DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(Settings::from_vars(vars(&[base, ("DEBUG", "maybe")])).is_err());
    }

    #[test]
    fn blank_token_counts_as_unset() {
        let s = Settings::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("INIT_DB_TOKEN", "  "),
        ]))
        .unwrap();
        assert_eq!(s.init_db_token, None);
    }
}
