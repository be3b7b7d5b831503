use std::net::SocketAddr;

use anyhow::{Context, Result, ensure};

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    /// Durable audit trail when set; in-memory otherwise.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub company_currency: String,
    pub secondary_currency: String,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        default_http_addr: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        http_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("HTTP_ADDR '{http_addr}' is not a socket address"))?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS '{value}' is not a number"))?,
            None => 5,
        };
        ensure!(
            database_max_connections > 0,
            "DATABASE_MAX_CONNECTIONS must be at least 1"
        );
        let company_currency = currency_code(lookup("COMPANY_CURRENCY"), "LKR")
            .context("COMPANY_CURRENCY is invalid")?;
        let secondary_currency = currency_code(lookup("SECONDARY_CURRENCY"), "USD")
            .context("SECONDARY_CURRENCY is invalid")?;

        Ok(Self {
            http_addr,
            database_url,
            database_max_connections,
            company_currency,
            secondary_currency,
        })
    }
}

fn currency_code(value: Option<String>, default: &str) -> Result<String> {
    let code = value
        .map(|code| code.trim().to_ascii_uppercase())
        .unwrap_or_else(|| default.to_string());
    ensure!(
        code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()),
        "expected a three-letter currency code, got '{code}'"
    );
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        ServiceConfig::from_lookup("0.0.0.0:8080", |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = config(&[]).unwrap();
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.company_currency, "LKR");
        assert_eq!(config.secondary_currency, "USD");
    }

    #[test]
    fn env_overrides_are_normalized() {
        let config = config(&[
            ("SECONDARY_CURRENCY", " eur "),
            ("DATABASE_URL", "postgres://localhost/pettycash"),
        ])
        .unwrap();
        assert_eq!(config.secondary_currency, "EUR");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/pettycash")
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(config(&[("HTTP_ADDR", "nowhere")]).is_err());
        assert!(config(&[("COMPANY_CURRENCY", "rupees")]).is_err());
        assert!(config(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert_eq!(
            config(&[("DATABASE_MAX_CONNECTIONS", "12")])
                .unwrap()
                .database_max_connections,
            12
        );
    }
}
