// ============================================================================
// Préférences d'onboarding
// ============================================================================
// Choix de l'utilisateur (coins suivis, profil investisseur, sections
// affichées) + la liste des options proposées par le backend.
//
// CONCEPTS RUST :
// 1. Constantes : listes de secours quand /api/preferences/options échoue
// 2. Validation locale avant tout appel réseau (anyhow::bail!)
// 3. #[serde(default)] : le backend peut omettre des champs
// ============================================================================

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Assets proposés si l'endpoint d'options est indisponible
pub const FALLBACK_ASSETS: [&str; 10] = [
    "BTC", "ETH", "USDT", "USDC", "BNB", "XRP", "SOL", "DOT", "ADA", "DOGE",
];

/// Profils investisseurs proposés si l'endpoint d'options est indisponible
pub const FALLBACK_INVESTOR_TYPES: [&str; 5] = [
    "HODLER",
    "DAY_TRADER",
    "NFT_COLLECTOR",
    "DEFI_DGEN",
    "LONG_TERM_INVESTOR",
];

// ============================================================================
// Structure : Preferences
// ============================================================================

/// Préférences d'un utilisateur (corps de GET/POST /api/preferences/me)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Symboles sélectionnés, dans l'ordre de sélection
    pub crypto_assets: Vec<String>,

    /// Profil investisseur (vide = pas encore choisi)
    pub investor_type: String,

    /// Affiche la section news
    pub market_news: bool,

    /// Affiche la section prix
    pub charts: bool,

    /// Conservé pour le backend, ne pilote aucune section
    pub social: bool,

    /// Affiche la section meme
    pub fun: bool,

    /// Onboarding terminé (renvoyé par le backend, ignoré à l'envoi)
    #[serde(skip_serializing)]
    pub completed: bool,
}

impl Preferences {
    /// Ajoute ou retire un asset de la sélection
    pub fn toggle_asset(&mut self, asset: &str) {
        if let Some(pos) = self.crypto_assets.iter().position(|a| a == asset) {
            self.crypto_assets.remove(pos);
        } else {
            self.crypto_assets.push(asset.to_string());
        }
    }

    pub fn has_asset(&self, asset: &str) -> bool {
        self.crypto_assets.iter().any(|a| a == asset)
    }

    /// Au moins une section de contenu activée (social ne compte pas)
    pub fn has_content_toggle(&self) -> bool {
        self.market_news || self.charts || self.fun
    }

    /// Vérifie les préférences avant l'envoi au backend
    ///
    /// Les messages sont affichés tels quels dans la ligne de statut.
    pub fn validate(&self) -> Result<()> {
        if self.crypto_assets.is_empty() {
            bail!("Please select at least one coin.");
        }
        if self.investor_type.trim().is_empty() {
            bail!("Please choose an investor type.");
        }
        if !self.has_content_toggle() {
            bail!("Please enable at least one content type.");
        }
        Ok(())
    }

    /// validate() + le profil doit faire partie des options proposées
    ///
    /// Une liste d'options vide n'impose rien.
    pub fn validate_with(&self, options: &PreferenceOptions) -> Result<()> {
        self.validate()?;
        if !options.investor_types.is_empty() && !options.offers_investor_type(&self.investor_type) {
            bail!("Please choose an investor type.");
        }
        Ok(())
    }
}

// ============================================================================
// Structure : PreferenceOptions
// ============================================================================

/// Options d'onboarding (GET /api/preferences/options)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceOptions {
    pub crypto_asset_suggestions: Vec<String>,
    pub investor_types: Vec<String>,
    pub content_preferences: Vec<Value>,
}

impl PreferenceOptions {
    /// Options de secours (10 assets, 5 profils)
    pub fn fallback() -> Self {
        Self {
            crypto_asset_suggestions: FALLBACK_ASSETS.iter().map(|s| s.to_string()).collect(),
            investor_types: FALLBACK_INVESTOR_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            content_preferences: Vec::new(),
        }
    }

    pub fn offers_investor_type(&self, investor_type: &str) -> bool {
        self.investor_types.iter().any(|t| t == investor_type)
    }

    /// Complète les listes vides avec les valeurs de secours
    pub fn or_fallback(mut self) -> Self {
        let fallback = Self::fallback();
        if self.crypto_asset_suggestions.is_empty() {
            self.crypto_asset_suggestions = fallback.crypto_asset_suggestions;
        }
        if self.investor_types.is_empty() {
            self.investor_types = fallback.investor_types;
        }
        self
    }
}

impl Default for PreferenceOptions {
    fn default() -> Self {
        Self::fallback()
    }
}

// ============================================================================
// Tests
// ============================================================================
