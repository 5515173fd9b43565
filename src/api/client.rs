// ============================================================================
// API Client : backend Crypto Advisor
// ============================================================================
// Client HTTP+JSON pour le backend (auth Basic, préférences, dashboard,
// votes). Toute réponse hors 2xx devient une seule erreur texte : le corps
// de la réponse, ou "Request failed (<status>)" s'il est vide.
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Traits async (async-trait) : client réel vs client de test
// 3. Serde : (dé)sérialisation JSON automatique
// 4. Debug manuel : ne jamais logger un mot de passe
// ============================================================================

use std::fmt;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::Settings;
use crate::ledger::Vote;
use crate::models::{ContentId, PreferenceOptions, Preferences, Section, Snapshot};

// ============================================================================
// Credentials
// ============================================================================

/// Identifiants envoyés à chaque appel (HTTP Basic)
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Les deux champs sont remplis
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// CONCEPT RUST : impl Debug à la main
// - #[derive(Debug)] afficherait le mot de passe dans les logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// ============================================================================
// Corps des requêtes et réponses
// ============================================================================

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for AuthRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: &credentials.username,
            password: &credentials.password,
        }
    }
}

/// Réponse de POST /api/auth/login
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    pub message: Option<String>,
    pub onboarding_completed: bool,
}

/// Corps de POST /api/dashboard/{id}/feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    pub vote: Vote,
}

// ============================================================================
// Trait : AdvisorApi
// ============================================================================
// CONCEPT RUST : Trait comme interface
// - La session ne dépend que de ce trait
// - En production : HttpAdvisorClient (reqwest)
// - En test : un faux client qui compte les appels
// ============================================================================

/// Opérations exposées par le backend
#[async_trait]
pub trait AdvisorApi: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<()>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    async fn preference_options(&self) -> Result<PreferenceOptions>;

    /// None si l'utilisateur n'a encore rien enregistré
    async fn preferences(&self, credentials: &Credentials) -> Result<Option<Preferences>>;

    async fn save_preferences(&self, credentials: &Credentials, prefs: &Preferences) -> Result<()>;

    async fn dashboard_today(&self, credentials: &Credentials) -> Result<Snapshot>;

    async fn vote(&self, credentials: &Credentials, snapshot_id: i64, request: &VoteRequest) -> Result<()>;
}

// ============================================================================
// Structure : HttpAdvisorClient
// ============================================================================

/// Client reqwest vers le backend
#[derive(Debug, Clone)]
pub struct HttpAdvisorClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAdvisorClient {
    /// Crée le client à partir de la configuration
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ajoute l'en-tête Authorization: Basic base64(user:password)
    fn authed(&self, builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        builder.basic_auth(&credentials.username, Some(&credentials.password))
    }

    /// Envoie la requête et transforme les statuts non-2xx en erreur texte
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .context("Échec de la requête HTTP vers le backend")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Backend returned error status");
            bail!("{}", error_message(status, &body));
        }

        Ok(response)
    }
}

/// Message d'erreur présenté à l'utilisateur pour un statut non-2xx
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("Request failed ({})", status.as_u16())
    } else {
        body.to_string()
    }
}

#[async_trait]
impl AdvisorApi for HttpAdvisorClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn register(&self, credentials: &Credentials) -> Result<()> {
        let request = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&AuthRequest::from(credentials));
        self.send(request).await?;
        info!("Registration accepted");
        Ok(())
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&AuthRequest::from(credentials));
        let login: LoginResponse = self
            .send(request)
            .await?
            .json()
            .await
            .context("Échec du parsing JSON de la réponse de login")?;
        info!(onboarding_completed = login.onboarding_completed, "Login accepted");
        Ok(login)
    }

    #[instrument(skip(self))]
    async fn preference_options(&self) -> Result<PreferenceOptions> {
        let request = self.http.get(self.url("/api/preferences/options"));
        let options = self
            .send(request)
            .await?
            .json()
            .await
            .context("Échec du parsing JSON des options de préférences")?;
        Ok(options)
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn preferences(&self, credentials: &Credentials) -> Result<Option<Preferences>> {
        let request = self.authed(self.http.get(self.url("/api/preferences/me")), credentials);
        let body = self
            .send(request)
            .await?
            .text()
            .await
            .context("Échec de la lecture des préférences")?;

        // Corps vide ou "null" : pas encore de préférences
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).context("Échec du parsing JSON des préférences")
    }

    #[instrument(skip(self, credentials, prefs), fields(username = %credentials.username))]
    async fn save_preferences(&self, credentials: &Credentials, prefs: &Preferences) -> Result<()> {
        let request = self
            .authed(self.http.post(self.url("/api/preferences/me")), credentials)
            .json(prefs);
        self.send(request).await?;
        info!(assets = prefs.crypto_assets.len(), "Preferences saved");
        Ok(())
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn dashboard_today(&self, credentials: &Credentials) -> Result<Snapshot> {
        let request = self.authed(self.http.get(self.url("/api/dashboard/today")), credentials);
        let snapshot: Snapshot = self
            .send(request)
            .await?
            .json()
            .await
            .context("Échec du parsing JSON du snapshot")?;
        info!(snapshot_id = snapshot.id, "Dashboard snapshot fetched");
        Ok(snapshot)
    }

    #[instrument(skip(self, credentials, request), fields(section = %request.section, vote = %request.vote))]
    async fn vote(&self, credentials: &Credentials, snapshot_id: i64, request: &VoteRequest) -> Result<()> {
        let path = format!("/api/dashboard/{}/feedback", snapshot_id);
        let builder = self
            .authed(self.http.post(self.url(&path)), credentials)
            .json(request);
        self.send(builder).await?;
        info!(snapshot_id, "Vote accepted");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, "Invalid credentials"),
            "Invalid credentials"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "Request failed (500)"
        );
    }

    #[test]
    fn test_vote_request_body() {
        let request = VoteRequest {
            section: Section::MarketNews,
            content_id: Some(ContentId(42)),
            vote: Vote::Down,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "section": "MARKET_NEWS", "contentId": 42, "vote": -1 })
        );

        let section_vote = VoteRequest {
            section: Section::CoinPrices,
            content_id: None,
            vote: Vote::Up,
        };
        assert_eq!(
            serde_json::to_value(&section_vote).unwrap(),
            json!({ "section": "COIN_PRICES", "vote": 1 })
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_login_response_defaults() {
        let login: LoginResponse = serde_json::from_value(json!({ "message": "ok" })).unwrap();
        assert!(!login.onboarding_completed);
    }

    #[test]
    fn test_client_base_url_trimmed() {
        let settings = Settings {
            api_url: "http://localhost:8080/".to_string(),
            ..Settings::default()
        };
        let client = HttpAdvisorClient::new(&settings).unwrap();
        assert_eq!(client.url("/api/dashboard/today"), "http://localhost:8080/api/dashboard/today");
    }
}
