// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'interface TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état de l'écran dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Séparation : la Session (réseau, ledger) vit dans le worker thread,
//    App ne garde qu'une copie de ce qu'il faut afficher
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Le worker pousse des SessionUpdate, appliqués par apply_update()
// ============================================================================

use crate::api::{AdvisorApi, Credentials};
use crate::ledger::Vote;
use crate::models::{PreferenceOptions, Preferences};
use crate::session::{Route, Session, StatusLine};
use crate::view_model::{DashboardView, VoteTarget};

// ============================================================================
// Enums : Screen / LoginField
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Saisie des identifiants
    Login,

    /// Quiz de préférences
    Onboarding,

    /// Contenu du jour + votes
    Dashboard,
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::Login => Screen::Login,
            Route::Onboarding => Screen::Onboarding,
            Route::Dashboard => Screen::Dashboard,
        }
    }
}

/// Champ actif sur l'écran de login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Copie de l'état de la session envoyée par le worker
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub route: Route,
    pub status: StatusLine,
    pub view: Option<DashboardView>,
    pub draft: Preferences,
    pub options: PreferenceOptions,
}

impl SessionUpdate {
    /// Photographie l'état courant de la session
    pub fn capture<C: AdvisorApi>(session: &Session<C>) -> Self {
        Self {
            route: session.route(),
            status: session.status().clone(),
            view: session.view(),
            draft: session.draft().clone(),
            options: session.options().clone(),
        }
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression = confirmation demandée
    pub confirm_quit: bool,

    /// Une commande est en cours dans le worker
    pub is_loading: bool,

    // --- Login ---
    pub username: String,
    pub password: String,
    pub focused_field: LoginField,

    // --- Onboarding ---
    pub options: PreferenceOptions,
    pub draft: Preferences,
    /// Position du curseur dans la liste des assets proposés
    pub asset_cursor: usize,

    // --- Dashboard ---
    pub view: Option<DashboardView>,
    /// Index dans view.vote_targets()
    pub selected_target: usize,

    /// Dernier message de la session
    pub status: StatusLine,
}

impl App {
    /// Crée une nouvelle instance sur l'écran de login
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Login,
            confirm_quit: false,
            is_loading: false,
            username: String::new(),
            password: String::new(),
            focused_field: LoginField::Username,
            options: PreferenceOptions::fallback(),
            draft: Preferences::default(),
            asset_cursor: 0,
            view: None,
            selected_target: 0,
            status: StatusLine::Idle,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self) {
        self.is_loading = true;
    }

    /// Applique l'état envoyé par le worker
    ///
    /// Le brouillon du quiz n'est écrasé que hors de l'écran d'onboarding,
    /// pour ne pas perdre une saisie en cours.
    pub fn apply_update(&mut self, update: SessionUpdate) {
        let screen = Screen::from(update.route);
        if screen != Screen::Onboarding || self.current_screen != Screen::Onboarding {
            self.draft = update.draft;
        }
        if screen == Screen::Login && self.current_screen != Screen::Login {
            self.password.clear();
        }

        self.current_screen = screen;
        self.options = update.options;
        self.status = update.status;
        self.view = update.view;
        self.is_loading = false;

        let max_index = self.target_count().saturating_sub(1);
        self.selected_target = self.selected_target.min(max_index);
        let max_asset = self.options.crypto_asset_suggestions.len().saturating_sub(1);
        self.asset_cursor = self.asset_cursor.min(max_asset);
    }

    // ========================================================================
    // Login
    // ========================================================================

    pub fn focus_next_field(&mut self) {
        self.focused_field = match self.focused_field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn append_char(&mut self, c: char) {
        match self.focused_field {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focused_field {
            LoginField::Username => self.username.pop(),
            LoginField::Password => self.password.pop(),
        };
    }

    /// Identifiants saisis, None si un champ est vide
    pub fn credentials(&self) -> Option<Credentials> {
        let credentials = Credentials::new(self.username.trim(), self.password.as_str());
        credentials.is_complete().then_some(credentials)
    }

    /// Après un register réussi, les champs sont vidés
    pub fn clear_credentials(&mut self) {
        self.username.clear();
        self.password.clear();
        self.focused_field = LoginField::Username;
    }

    // ========================================================================
    // Onboarding
    // ========================================================================

    pub fn asset_up(&mut self) {
        self.asset_cursor = self.asset_cursor.saturating_sub(1);
    }

    pub fn asset_down(&mut self) {
        let max_index = self.options.crypto_asset_suggestions.len().saturating_sub(1);
        self.asset_cursor = (self.asset_cursor + 1).min(max_index);
    }

    /// Sélectionne / désélectionne l'asset sous le curseur
    pub fn toggle_current_asset(&mut self) {
        if let Some(asset) = self.options.crypto_asset_suggestions.get(self.asset_cursor) {
            let asset = asset.clone();
            self.draft.toggle_asset(&asset);
        }
    }

    /// Passe au profil investisseur suivant (ou précédent)
    ///
    /// CONCEPT : Cycle d'états
    /// - "" -> premier profil -> ... -> dernier -> premier
    pub fn cycle_investor_type(&mut self, forward: bool) {
        let types = &self.options.investor_types;
        if types.is_empty() {
            return;
        }

        let current = types.iter().position(|t| *t == self.draft.investor_type);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => types.len() - 1,
            (Some(i), true) => (i + 1) % types.len(),
            (Some(i), false) => (i + types.len() - 1) % types.len(),
        };
        self.draft.investor_type = types[next].clone();
    }

    /// Toggle de section : 'n' news, 'c' charts, 's' social, 'f' fun
    pub fn toggle_content(&mut self, key: char) {
        let flag = match key {
            'n' => &mut self.draft.market_news,
            'c' => &mut self.draft.charts,
            's' => &mut self.draft.social,
            'f' => &mut self.draft.fun,
            _ => return,
        };
        *flag = !*flag;
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    pub fn target_count(&self) -> usize {
        self.view.as_ref().map(|v| v.vote_targets().len()).unwrap_or(0)
    }

    pub fn navigate_up(&mut self) {
        self.selected_target = self.selected_target.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.target_count().saturating_sub(1);
        self.selected_target = (self.selected_target + 1).min(max_index);
    }

    /// Cible de vote sélectionnée
    pub fn selected_target(&self) -> Option<VoteTarget> {
        let view = self.view.as_ref()?;
        view.vote_targets()
            .get(self.selected_target)
            .map(|target| (*target).clone())
    }

    /// Cible à envoyer au worker, seulement si elle est encore votable
    pub fn votable_selection(&self) -> Option<VoteTarget> {
        self.selected_target().filter(VoteTarget::is_open)
    }

    /// Affiche "Voting n..." et passe en chargement
    ///
    /// L'item n'est verrouillé qu'à la réception de l'état publié par le
    /// worker après begin_vote.
    pub fn mark_voting(&mut self, vote: Vote) {
        self.status = StatusLine::Info(format!("Voting {}...", vote));
        self.is_loading = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
