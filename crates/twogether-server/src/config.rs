use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

const PLACEHOLDER_SECRETS: [&str; 3] = ["dev-secret-change-me", "changeme", "secret"];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let development = var("TWOGETHER_ENV").is_some_and(|v| v == "development");

        let jwt_secret = match var("TWOGETHER_JWT_SECRET") {
            Some(s) if !s.trim().is_empty() => s,
            _ if development => "dev-secret-change-me".into(),
            _ => bail!("TWOGETHER_JWT_SECRET must be set"),
        };
        if !development && PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("TWOGETHER_JWT_SECRET is a placeholder; set TWOGETHER_ENV=development to allow it");
        }

        let db_path = var("TWOGETHER_DB_PATH").unwrap_or_else(|| "twogether.db".into());
        let host = var("TWOGETHER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("TWOGETHER_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("TWOGETHER_PORT must be a port number")?;

        let addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            jwt_secret,
            db_path: PathBuf::from(db_path),
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("TWOGETHER_JWT_SECRET", "a-real-secret")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("twogether.db"));
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn secret_required_outside_development() {
        assert!(load(&[]).is_err());
        assert!(load(&[("TWOGETHER_JWT_SECRET", "changeme")]).is_err());

        let dev = load(&[("TWOGETHER_ENV", "development")]).unwrap();
        assert_eq!(dev.jwt_secret, "dev-secret-change-me");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = load(&[
            ("TWOGETHER_JWT_SECRET", "a-real-secret"),
            ("TWOGETHER_PORT", "http"),
        ]);
        assert!(err.is_err());
    }
}
