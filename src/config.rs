// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration depuis l'environnement (et un fichier .env optionnel)
//
// Variables :
// - HODLBOARD_API_URL        : URL du backend (défaut http://localhost:8080)
// - HODLBOARD_USER_AGENT     : User-Agent des requêtes HTTP
// - HODLBOARD_LOG_DIR        : répertoire des logs (défaut ./logs)
// - HODLBOARD_REFRESH_POLICY : "refetch" (défaut) ou "ledger-only"
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::view_model::RefreshPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub user_agent: String,
    pub log_dir: PathBuf,
    pub refresh_policy: RefreshPolicy,
}

impl Settings {
    /// Charge .env (s'il existe) puis lit les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // .env absent : ce n'est pas une erreur
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// Séparé de from_env() pour pouvoir tester sans toucher à l'environnement
    /// du process.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let refresh_policy = match read("HODLBOARD_REFRESH_POLICY") {
            Some(raw) => raw
                .parse()
                .context("HODLBOARD_REFRESH_POLICY is invalid")?,
            None => defaults.refresh_policy,
        };

        Ok(Self {
            api_url: read("HODLBOARD_API_URL").unwrap_or(defaults.api_url),
            user_agent: read("HODLBOARD_USER_AGENT").unwrap_or(defaults.user_agent),
            log_dir: read("HODLBOARD_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            refresh_policy,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: format!("hodlboard/{}", env!("CARGO_PKG_VERSION")),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.refresh_policy, RefreshPolicy::Refetch);
        assert!(settings.user_agent.starts_with("hodlboard/"));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("HODLBOARD_API_URL", "https://advisor.example"),
            ("HODLBOARD_REFRESH_POLICY", "ledger-only"),
            ("HODLBOARD_LOG_DIR", "  "),
        ]))
        .unwrap();
        assert_eq!(settings.api_url, "https://advisor.example");
        assert_eq!(settings.refresh_policy, RefreshPolicy::LedgerOnly);
        assert_eq!(settings.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    }

    #[test]
    fn test_invalid_policy() {
        assert!(Settings::from_lookup(lookup(&[("HODLBOARD_REFRESH_POLICY", "never")])).is_err());
    }
}
