// ============================================================================
// Session
// ============================================================================
// Contexte explicite d'une session utilisateur : identifiants, ledger de
// votes, snapshot courant, brouillon de préférences et ligne de statut.
//
// Cycle de vie :
// - login()  : initialise les identifiants et un ledger vide
// - logout() : efface tout et retourne à l'écran de login
//
// Toutes les erreurs du backend sont réduites à une seule chaîne affichée
// dans la ligne de statut.
//
// CONCEPTS RUST :
// 1. Génériques avec trait bound : Session<C: AdvisorApi>
// 2. async fn sur &mut self : une opération à la fois par session
// 3. Vote en deux phases : begin_vote (sync) / finish_vote (async)
// ============================================================================

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::api::{AdvisorApi, Credentials, VoteRequest};
use crate::ledger::{LedgerKey, Vote, VoteLedger};
use crate::models::{PreferenceOptions, Preferences};
use crate::view_model::{
    DashboardView, DashboardViewModel, RefreshPolicy, SectionVisibility, VoteTarget,
};

// ============================================================================
// Route et statut
// ============================================================================

/// Écran vers lequel la session oriente l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    /// Quiz de préférences (onboarding pas terminé)
    Onboarding,
    Dashboard,
}

/// Ligne de statut visible par l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Idle,
    Info(String),
    Error(String),
}

impl StatusLine {
    pub fn message(&self) -> Option<&str> {
        match self {
            StatusLine::Idle => None,
            StatusLine::Info(msg) | StatusLine::Error(msg) => Some(msg),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusLine::Error(_))
    }
}

// ============================================================================
// Votes en cours
// ============================================================================

/// Vote enregistré de façon optimiste, en attente de la réponse du backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    pub key: LedgerKey,
    pub snapshot_id: i64,
    pub request: VoteRequest,
}

/// Résultat d'une action de vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Déjà voté (ou pas de snapshot) : aucun appel réseau
    Skipped,
    /// Accepté par le backend
    Recorded,
    /// Refusé : le ledger a été remis à l'état précédent
    RolledBack(String),
}

// ============================================================================
// Structure : Session
// ============================================================================

pub struct Session<C: AdvisorApi> {
    client: C,
    credentials: Option<Credentials>,
    ledger: VoteLedger,
    dashboard: DashboardViewModel,
    draft: Preferences,
    options: PreferenceOptions,
    route: Route,
    status: StatusLine,
}

impl<C: AdvisorApi> Session<C> {
    pub fn new(client: C, refresh_policy: RefreshPolicy) -> Self {
        Self {
            client,
            credentials: None,
            ledger: VoteLedger::new(),
            dashboard: DashboardViewModel::new(refresh_policy),
            draft: Preferences::default(),
            options: PreferenceOptions::fallback(),
            route: Route::Login,
            status: StatusLine::Idle,
        }
    }

    // ========================================================================
    // Accesseurs
    // ========================================================================

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn options(&self) -> &PreferenceOptions {
        &self.options
    }

    pub fn draft(&self) -> &Preferences {
        &self.draft
    }

    /// Brouillon modifiable par le quiz (toggles, assets, profil)
    pub fn draft_mut(&mut self) -> &mut Preferences {
        &mut self.draft
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_some()
    }

    /// Vue courante (None tant qu'aucun snapshot n'est chargé)
    pub fn view(&self) -> Option<DashboardView> {
        self.dashboard.view(&self.ledger)
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = StatusLine::Info(message.into());
    }

    /// Réduit l'erreur à une chaîne, l'affiche et la renvoie
    fn fail(&mut self, err: anyhow::Error) -> anyhow::Error {
        let message = err.to_string();
        warn!(error = %message, "Session operation failed");
        self.status = StatusLine::Error(message.clone());
        anyhow!(message)
    }

    fn require_credentials(&self) -> Result<Credentials> {
        self.credentials
            .clone()
            .context("Please log in first.")
    }

    // ========================================================================
    // Options et authentification
    // ========================================================================

    /// Charge les options d'onboarding ; en cas d'échec, listes de secours
    ///
    /// Une erreur ici n'est jamais affichée.
    pub async fn load_options(&mut self) {
        self.options = match self.client.preference_options().await {
            Ok(options) => options.or_fallback(),
            Err(e) => {
                warn!(error = %e, "Preference options unavailable, using fallback lists");
                PreferenceOptions::fallback()
            }
        };
    }

    pub async fn register(&mut self, credentials: Credentials) -> Result<()> {
        self.info("register...");
        let result = self.client.register(&credentials).await;
        match result {
            Ok(()) => {
                info!(username = %credentials.username, "User registered");
                self.info("Registration successful. You can now log in.");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Connecte l'utilisateur et choisit l'écran suivant
    ///
    /// onboardingCompleted=false mène au quiz, sinon au dashboard. Les
    /// préférences existantes sont chargées au mieux (erreurs ignorées).
    pub async fn login(&mut self, credentials: Credentials) -> Result<Route> {
        self.info("login...");
        let result = self.client.login(&credentials).await;
        let login = match result {
            Ok(login) => login,
            Err(e) => return Err(self.fail(e)),
        };

        // Nouvelle session : ledger et snapshot repartent de zéro
        self.ledger.clear();
        self.dashboard.clear();
        self.draft = Preferences::default();

        let stored = self.client.preferences(&credentials).await;
        match stored {
            Ok(Some(prefs)) if !prefs.crypto_assets.is_empty() => {
                debug!(assets = prefs.crypto_assets.len(), "Loaded existing preferences");
                self.dashboard
                    .set_visibility(SectionVisibility::from_preferences(&prefs));
                self.draft = prefs;
            }
            Ok(_) => debug!("No stored preferences"),
            Err(e) => debug!(error = %e, "Ignoring preferences fetch failure"),
        }

        self.credentials = Some(credentials);
        self.route = if login.onboarding_completed {
            Route::Dashboard
        } else {
            Route::Onboarding
        };
        self.info("Login ok.");
        info!(route = ?self.route, "Login succeeded");
        Ok(self.route)
    }

    /// Efface tout l'état de la session
    pub fn logout(&mut self) {
        info!("Logging out");
        self.credentials = None;
        self.ledger.clear();
        self.dashboard.clear();
        self.draft = Preferences::default();
        self.route = Route::Login;
        self.status = StatusLine::Idle;
    }

    // ========================================================================
    // Préférences
    // ========================================================================

    /// Valide et enregistre le brouillon, puis charge le dashboard
    ///
    /// Une validation locale qui échoue ne déclenche aucun appel réseau.
    pub async fn save_preferences(&mut self) -> Result<()> {
        if let Err(e) = self.draft.validate_with(&self.options) {
            return Err(self.fail(e));
        }
        let credentials = match self.require_credentials() {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e)),
        };

        self.info("Saving preferences...");
        let result = self.client.save_preferences(&credentials, &self.draft).await;
        if let Err(e) = result {
            return Err(self.fail(e));
        }

        self.draft.completed = true;
        self.dashboard
            .set_visibility(SectionVisibility::from_preferences(&self.draft));
        self.route = Route::Dashboard;
        self.info("Preferences saved. Loading dashboard...");

        self.load_dashboard().await
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Récupère le snapshot du jour et remplace le précédent
    pub async fn load_dashboard(&mut self) -> Result<()> {
        let credentials = match self.require_credentials() {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e)),
        };

        self.info("Loading dashboard...");
        let result = self.client.dashboard_today(&credentials).await;
        match result {
            Ok(snapshot) => {
                self.dashboard.replace_snapshot(snapshot);
                self.info("Dashboard loaded.");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ========================================================================
    // Votes
    // ========================================================================

    /// Phase 1 : vérifie le ledger et enregistre le vote de façon optimiste
    ///
    /// None si la clé a déjà un vote (deuxième clic = no-op) ou s'il n'y a
    /// pas de snapshot.
    pub fn begin_vote(&mut self, target: &VoteTarget, vote: Vote) -> Option<PendingVote> {
        let snapshot_id = self.dashboard.snapshot()?.id;

        if self.ledger.has(&target.key) {
            debug!(key = %target.key, "Vote already recorded, ignoring");
            return None;
        }

        self.ledger.record_optimistic(target.key.clone(), vote);
        self.info(format!("Voting {}...", vote));

        Some(PendingVote {
            key: target.key.clone(),
            snapshot_id,
            request: VoteRequest {
                section: target.section,
                content_id: target.content_id,
                vote,
            },
        })
    }

    /// Phase 2 : applique la réponse du backend
    ///
    /// Succès : statut + rafraîchissement selon la politique.
    /// Échec : rollback conditionnel, l'item redevient votable.
    pub async fn finish_vote(&mut self, pending: PendingVote, result: Result<()>) -> VoteOutcome {
        match result {
            Ok(()) => {
                info!(key = %pending.key, vote = %pending.request.vote, "Vote recorded");
                self.info("Vote recorded.");
                if self.dashboard.refresh_policy() == RefreshPolicy::Refetch {
                    // Échec du rechargement : déjà reporté dans le statut
                    let _ = self.load_dashboard().await;
                }
                VoteOutcome::Recorded
            }
            Err(e) => {
                self.ledger.rollback(&pending.key, pending.request.vote);
                let err = self.fail(e);
                VoteOutcome::RolledBack(err.to_string())
            }
        }
    }

    /// Envoie un vote en attente au backend (ne touche pas au ledger)
    pub async fn submit_vote(&self, pending: &PendingVote) -> Result<()> {
        let credentials = self.credentials.as_ref().context("Please log in first.")?;
        self.client
            .vote(credentials, pending.snapshot_id, &pending.request)
            .await
    }

    /// Vote complet : begin_vote -> submit_vote -> finish_vote
    pub async fn vote(&mut self, target: &VoteTarget, vote: Vote) -> VoteOutcome {
        let pending = match self.begin_vote(target, vote) {
            Some(pending) => pending,
            None => return VoteOutcome::Skipped,
        };

        let result = self.submit_vote(&pending).await;
        self.finish_vote(pending, result).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::api::LoginResponse;
    use crate::ledger::Vote;
    use crate::models::{ContentId, Section, Snapshot};
    use crate::view_model::VoteState;

    /// Faux backend : enregistre les appels, réponses programmables
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<&'static str>>,
        onboarding_completed: bool,
        stored_prefs: Option<Preferences>,
        fail_options: bool,
        fail_register: bool,
        fail_vote: AtomicBool,
        snapshots: Mutex<VecDeque<Snapshot>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.calls().iter().filter(|c| **c == name).count()
        }

        fn push_snapshot(&self, snapshot: Snapshot) {
            self.snapshots.lock().unwrap().push_back(snapshot);
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }
    }

    #[async_trait]
    impl AdvisorApi for FakeApi {
        async fn register(&self, _credentials: &Credentials) -> Result<()> {
            self.record("register");
            if self.fail_register {
                bail!("Username already exists");
            }
            Ok(())
        }

        async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
            self.record("login");
            if credentials.password() != "secret" {
                bail!("Invalid credentials");
            }
            Ok(LoginResponse {
                message: None,
                onboarding_completed: self.onboarding_completed,
            })
        }

        async fn preference_options(&self) -> Result<PreferenceOptions> {
            self.record("options");
            if self.fail_options {
                bail!("Request failed (503)");
            }
            Ok(PreferenceOptions {
                crypto_asset_suggestions: vec!["BTC".to_string(), "ETH".to_string()],
                investor_types: vec!["HODLER".to_string()],
                content_preferences: Vec::new(),
            })
        }

        async fn preferences(&self, _credentials: &Credentials) -> Result<Option<Preferences>> {
            self.record("preferences");
            Ok(self.stored_prefs.clone())
        }

        async fn save_preferences(&self, _credentials: &Credentials, _prefs: &Preferences) -> Result<()> {
            self.record("save_preferences");
            Ok(())
        }

        async fn dashboard_today(&self, _credentials: &Credentials) -> Result<Snapshot> {
            self.record("dashboard_today");
            let mut queue = self.snapshots.lock().unwrap();
            // Le dernier snapshot reste servi indéfiniment
            if queue.len() > 1 {
                Ok(queue.pop_front().unwrap())
            } else {
                queue.front().cloned().ok_or_else(|| anyhow!("Request failed (404)"))
            }
        }

        async fn vote(&self, _credentials: &Credentials, _snapshot_id: i64, _request: &VoteRequest) -> Result<()> {
            self.record("vote");
            if self.fail_vote.load(Ordering::SeqCst) {
                bail!("Vote must be -1, 0, or 1");
            }
            Ok(())
        }
    }

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "id": 21,
            "snapshotDate": "2024-05-01",
            "marketNews": { "BTC": { "contentId": 1, "data": { "results": [{ "title": "Hello" }] } } },
            "coinPrices": { "BTC": { "contentId": 2, "data": { "usd": 65000 } } },
            "aiInsight": { "BTC": { "contentId": 3, "data": { "summary": "HODLER note on BTC: calm" } } },
            "meme": { "BTC": { "contentId": 4, "data": { "url": "https://meme" } } }
        }))
        .unwrap()
    }

    fn credentials() -> Credentials {
        Credentials::new("alice", "secret")
    }

    async fn dashboard_session(api: FakeApi) -> Session<FakeApi> {
        api.push_snapshot(snapshot());
        let mut session = Session::new(api, RefreshPolicy::Refetch);
        session.login(credentials()).await.unwrap();
        session.load_dashboard().await.unwrap();
        session
    }

    fn news_target(session: &Session<FakeApi>) -> VoteTarget {
        session.view().unwrap().news[0].target.clone().unwrap()
    }

    #[tokio::test]
    async fn test_login_without_onboarding_routes_to_quiz() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        let route = session.login(credentials()).await.unwrap();

        assert_eq!(route, Route::Onboarding);
        assert_eq!(session.route(), Route::Onboarding);
        assert_eq!(session.status(), &StatusLine::Info("Login ok.".to_string()));
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_with_onboarding_routes_to_dashboard() {
        let api = FakeApi {
            onboarding_completed: true,
            stored_prefs: Some(Preferences {
                crypto_assets: vec!["ETH".to_string()],
                investor_type: "DAY_TRADER".to_string(),
                charts: true,
                completed: true,
                ..Preferences::default()
            }),
            ..FakeApi::default()
        };
        let mut session = Session::new(api, RefreshPolicy::Refetch);

        assert_eq!(session.login(credentials()).await.unwrap(), Route::Dashboard);
        assert_eq!(session.draft().crypto_assets, vec!["ETH"]);
    }

    #[tokio::test]
    async fn test_failed_login_reports_status() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        let err = session
            .login(Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(session.status(), &StatusLine::Error("Invalid credentials".to_string()));
        assert_eq!(session.route(), Route::Login);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_empty_asset_selection_does_not_call_backend() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        session.login(credentials()).await.unwrap();
        session.draft_mut().investor_type = "HODLER".to_string();
        session.draft_mut().market_news = true;

        let err = session.save_preferences().await.unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one coin.");
        assert_eq!(
            session.status(),
            &StatusLine::Error("Please select at least one coin.".to_string())
        );
        assert_eq!(session.client().count("save_preferences"), 0);
    }

    #[tokio::test]
    async fn test_register_success_status() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        session.register(credentials()).await.unwrap();

        assert_eq!(
            session.status(),
            &StatusLine::Info("Registration successful. You can now log in.".to_string())
        );
        assert_eq!(session.client().calls(), vec!["register"]);
        // Register ne connecte pas l'utilisateur
        assert_eq!(session.route(), Route::Login);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_register_failure_reports_status() {
        let api = FakeApi {
            fail_register: true,
            ..FakeApi::default()
        };
        let mut session = Session::new(api, RefreshPolicy::Refetch);
        let err = session.register(credentials()).await.unwrap_err();

        assert_eq!(err.to_string(), "Username already exists");
        assert_eq!(
            session.status(),
            &StatusLine::Error("Username already exists".to_string())
        );
        assert!(session.status().is_error());
        assert_eq!(session.route(), Route::Login);
    }

    #[tokio::test]
    async fn test_unknown_investor_type_does_not_call_backend() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        session.login(credentials()).await.unwrap();
        session.draft_mut().toggle_asset("BTC");
        session.draft_mut().investor_type = "WHALE".to_string();
        session.draft_mut().fun = true;

        let err = session.save_preferences().await.unwrap_err();
        assert_eq!(err.to_string(), "Please choose an investor type.");
        assert_eq!(session.client().count("save_preferences"), 0);
        assert_eq!(session.route(), Route::Onboarding);
    }

    #[tokio::test]
    async fn test_save_preferences_loads_dashboard() {
        let api = FakeApi::default();
        api.push_snapshot(snapshot());
        let mut session = Session::new(api, RefreshPolicy::Refetch);
        session.login(credentials()).await.unwrap();

        session.draft_mut().toggle_asset("BTC");
        session.draft_mut().investor_type = "HODLER".to_string();
        session.draft_mut().charts = true;
        session.save_preferences().await.unwrap();

        assert_eq!(session.route(), Route::Dashboard);
        assert_eq!(session.status(), &StatusLine::Info("Dashboard loaded.".to_string()));
        let view = session.view().unwrap();
        assert!(!view.visibility.market_news);
        assert!(view.visibility.coin_prices);
    }

    #[tokio::test]
    async fn test_options_fallback_is_silent() {
        let api = FakeApi {
            fail_options: true,
            ..FakeApi::default()
        };
        let mut session = Session::new(api, RefreshPolicy::Refetch);
        session.load_options().await;

        assert_eq!(session.options().crypto_asset_suggestions.len(), 10);
        assert_eq!(session.options().investor_types.len(), 5);
        assert_eq!(session.status(), &StatusLine::Idle);
    }

    #[tokio::test]
    async fn test_vote_refetches_snapshot() {
        let mut session = dashboard_session(FakeApi::default()).await;
        let target = news_target(&session);

        let outcome = session.vote(&target, Vote::Up).await;
        assert_eq!(outcome, VoteOutcome::Recorded);
        assert_eq!(session.client().count("dashboard_today"), 2);

        let view = session.view().unwrap();
        assert_eq!(
            view.news[0].target.as_ref().unwrap().state,
            VoteState::Locked(Vote::Up)
        );
    }

    #[tokio::test]
    async fn test_second_vote_on_same_key_is_noop() {
        let mut session = dashboard_session(FakeApi::default()).await;
        let target = news_target(&session);

        assert_eq!(session.vote(&target, Vote::Up).await, VoteOutcome::Recorded);
        assert_eq!(session.vote(&target, Vote::Down).await, VoteOutcome::Skipped);

        assert_eq!(session.client().count("vote"), 1);
        assert_eq!(session.ledger().get(&target.key), Some(Vote::Up));
    }

    #[tokio::test]
    async fn test_failed_vote_rolls_back() {
        let api = FakeApi::default();
        api.fail_vote.store(true, Ordering::SeqCst);
        let mut session = dashboard_session(api).await;
        let target = news_target(&session);

        let outcome = session.vote(&target, Vote::Neutral).await;
        assert!(matches!(outcome, VoteOutcome::RolledBack(_)));
        assert!(!session.ledger().has(&target.key));
        assert!(session.status().is_error());

        // L'item redevient votable : un nouvel essai part sur le réseau
        session.client().fail_vote.store(false, Ordering::SeqCst);
        assert_eq!(session.vote(&target, Vote::Up).await, VoteOutcome::Recorded);
        assert_eq!(session.client().count("vote"), 2);
    }

    #[tokio::test]
    async fn test_interleaved_votes_on_different_keys() {
        let mut session = dashboard_session(FakeApi::default()).await;
        let view = session.view().unwrap();
        let news = view.news[0].target.clone().unwrap();
        let prices = view.prices_vote.clone().unwrap();

        let first = session.begin_vote(&news, Vote::Up).unwrap();
        let second = session.begin_vote(&prices, Vote::Down).unwrap();
        assert_eq!(second.request.content_id, None);
        assert_eq!(second.key, LedgerKey::section(Section::CoinPrices));

        // Le second se termine en premier, en échec ; le premier réussit
        let failed = session.finish_vote(second, Err(anyhow!("boom"))).await;
        assert_eq!(failed, VoteOutcome::RolledBack("boom".to_string()));
        let ok = session.finish_vote(first, Ok(())).await;
        assert_eq!(ok, VoteOutcome::Recorded);

        assert!(session.ledger().has(&LedgerKey::item(Section::MarketNews, ContentId(1))));
        assert!(!session.ledger().has(&LedgerKey::section(Section::CoinPrices)));
    }

    #[tokio::test]
    async fn test_ledger_only_policy_skips_refetch() {
        let api = FakeApi::default();
        api.push_snapshot(snapshot());
        let mut session = Session::new(api, RefreshPolicy::LedgerOnly);
        session.login(credentials()).await.unwrap();
        session.load_dashboard().await.unwrap();

        let target = news_target(&session);
        assert_eq!(session.vote(&target, Vote::Up).await, VoteOutcome::Recorded);
        assert_eq!(session.client().count("dashboard_today"), 1);
        assert_eq!(session.status(), &StatusLine::Info("Vote recorded.".to_string()));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let mut session = dashboard_session(FakeApi::default()).await;
        let target = news_target(&session);
        session.vote(&target, Vote::Up).await;

        session.logout();
        assert_eq!(session.route(), Route::Login);
        assert!(!session.is_logged_in());
        assert!(session.ledger().is_empty());
        assert!(session.view().is_none());
        assert!(session.load_dashboard().await.is_err());
    }

    #[test]
    fn test_vote_without_snapshot_is_skipped() {
        let mut session = Session::new(FakeApi::default(), RefreshPolicy::Refetch);
        let target = VoteTarget {
            section: Section::Meme,
            content_id: None,
            key: LedgerKey::section(Section::Meme),
            state: VoteState::Open,
        };
        assert!(session.begin_vote(&target, Vote::Up).is_none());
        assert!(session.ledger().is_empty());
    }
}
