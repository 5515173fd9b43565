// ============================================================================
// Dashboard View Model
// ============================================================================
// Combine les lignes normalisées du snapshot avec le ledger de votes pour
// décider, item par item, s'il faut afficher les boutons de vote ou le
// vote déjà choisi.
//
// CONCEPTS RUST :
// 1. Génériques : Votable<T> enveloppe n'importe quel type de ligne
// 2. FromStr : parser la politique de rafraîchissement depuis la config
// 3. Dérivation pure : view() ne modifie rien (&self)
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::ledger::{LedgerKey, Vote, VoteLedger};
use crate::models::{ContentId, Preferences, Section, Snapshot};
use crate::normalize::{
    normalize_insights, normalize_meme, normalize_news, normalize_prices, InsightRow, MemeCard,
    NewsRow, PriceRow,
};

// ============================================================================
// Enum : RefreshPolicy
// ============================================================================

/// Que faire après un vote accepté par le backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Recharge le snapshot complet (tallies à jour)
    #[default]
    Refetch,
    /// Garde le snapshot, seul le ledger change
    LedgerOnly,
}

impl FromStr for RefreshPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refetch" => Ok(RefreshPolicy::Refetch),
            "ledger-only" | "ledger_only" => Ok(RefreshPolicy::LedgerOnly),
            other => bail!("Unknown refresh policy '{}' (expected refetch or ledger-only)", other),
        }
    }
}

// ============================================================================
// Visibilité des sections
// ============================================================================

/// Sections à afficher selon les préférences
///
/// L'AI insight est toujours affiché.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVisibility {
    pub market_news: bool,
    pub coin_prices: bool,
    pub meme: bool,
}

impl SectionVisibility {
    pub fn all() -> Self {
        Self {
            market_news: true,
            coin_prices: true,
            meme: true,
        }
    }

    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            market_news: prefs.market_news,
            coin_prices: prefs.charts,
            meme: prefs.fun,
        }
    }

    pub fn shows(&self, section: Section) -> bool {
        match section {
            Section::MarketNews => self.market_news,
            Section::CoinPrices => self.coin_prices,
            Section::AiInsight => true,
            Section::Meme => self.meme,
        }
    }
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self::all()
    }
}

// ============================================================================
// Cibles de vote
// ============================================================================

/// État du vote pour un item affiché
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    /// Les trois boutons sont proposés
    Open,
    /// Vote déjà enregistré : seul ce vote est affiché
    Locked(Vote),
}

/// Tout ce qu'il faut pour envoyer un vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTarget {
    pub section: Section,
    pub content_id: Option<ContentId>,
    pub key: LedgerKey,
    pub state: VoteState,
}

impl VoteTarget {
    fn resolve(section: Section, content_id: Option<ContentId>, key: LedgerKey, ledger: &VoteLedger) -> Self {
        let state = match ledger.get(&key) {
            Some(vote) => VoteState::Locked(vote),
            None => VoteState::Open,
        };
        Self {
            section,
            content_id,
            key,
            state,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == VoteState::Open
    }
}

/// Une ligne + sa cible de vote (None : pas de contentId, pas de vote)
#[derive(Debug, Clone, PartialEq)]
pub struct Votable<T> {
    pub row: T,
    pub target: Option<VoteTarget>,
}

// ============================================================================
// Vue calculée
// ============================================================================

/// Lignes normalisées d'un snapshot, recalculées à chaque remplacement
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSections {
    pub news: Vec<NewsRow>,
    pub prices: Vec<PriceRow>,
    pub insights: Vec<InsightRow>,
    pub meme: Option<MemeCard>,
}

impl NormalizedSections {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            news: normalize_news(&snapshot.market_news),
            prices: normalize_prices(&snapshot.coin_prices),
            insights: normalize_insights(&snapshot.ai_insight),
            meme: normalize_meme(&snapshot.meme),
        }
    }
}

/// Ce que l'interface affiche
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub snapshot_id: i64,
    pub snapshot_date: Option<NaiveDate>,
    pub visibility: SectionVisibility,
    pub news: Vec<Votable<NewsRow>>,
    pub prices: Vec<PriceRow>,
    /// Vote du bloc des prix (None si aucun prix)
    pub prices_vote: Option<VoteTarget>,
    /// Vide = état "no insight" explicite
    pub insights: Vec<Votable<InsightRow>>,
    /// None = "no meme today"
    pub meme: Option<Votable<MemeCard>>,
    /// Dernier vote connu du backend, par section
    pub server_votes: BTreeMap<Section, Vote>,
}

impl DashboardView {
    /// Cibles de vote des sections visibles, dans l'ordre d'affichage
    pub fn vote_targets(&self) -> Vec<&VoteTarget> {
        let mut targets = Vec::new();

        if self.visibility.market_news {
            targets.extend(self.news.iter().filter_map(|n| n.target.as_ref()));
        }
        if self.visibility.coin_prices {
            targets.extend(self.prices_vote.as_ref());
        }
        targets.extend(self.insights.iter().filter_map(|i| i.target.as_ref()));
        if self.visibility.meme {
            targets.extend(self.meme.as_ref().and_then(|m| m.target.as_ref()));
        }

        targets
    }

    pub fn has_insight(&self) -> bool {
        !self.insights.is_empty()
    }
}

// ============================================================================
// Structure : DashboardViewModel
// ============================================================================

/// Snapshot courant + lignes normalisées + politique de rafraîchissement
#[derive(Debug, Clone, Default)]
pub struct DashboardViewModel {
    snapshot: Option<Snapshot>,
    sections: Option<NormalizedSections>,
    visibility: SectionVisibility,
    refresh_policy: RefreshPolicy,
}

impl DashboardViewModel {
    pub fn new(refresh_policy: RefreshPolicy) -> Self {
        Self {
            refresh_policy,
            ..Self::default()
        }
    }

    /// Remplace le snapshot en bloc et recalcule toutes les lignes
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        let sections = NormalizedSections::from_snapshot(&snapshot);
        debug!(
            snapshot_id = snapshot.id,
            news = sections.news.len(),
            prices = sections.prices.len(),
            insights = sections.insights.len(),
            meme = sections.meme.is_some(),
            "Normalized dashboard snapshot"
        );
        self.sections = Some(sections);
        self.snapshot = Some(snapshot);
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn set_visibility(&mut self, visibility: SectionVisibility) {
        self.visibility = visibility;
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    /// Oublie le snapshot (logout)
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.sections = None;
        self.visibility = SectionVisibility::all();
    }

    /// Calcule la vue à partir des lignes en cache et du ledger
    pub fn view(&self, ledger: &VoteLedger) -> Option<DashboardView> {
        let snapshot = self.snapshot.as_ref()?;
        let sections = self.sections.as_ref()?;

        let news = sections
            .news
            .iter()
            .map(|row| Votable {
                row: row.clone(),
                target: LedgerKey::for_item(Section::MarketNews, row.content_id).map(|key| {
                    VoteTarget::resolve(Section::MarketNews, row.content_id, key, ledger)
                }),
            })
            .collect();

        let prices_vote = (!sections.prices.is_empty()).then(|| {
            VoteTarget::resolve(
                Section::CoinPrices,
                None,
                LedgerKey::section(Section::CoinPrices),
                ledger,
            )
        });

        let insights = sections
            .insights
            .iter()
            .map(|row| Votable {
                row: row.clone(),
                target: LedgerKey::for_item(Section::AiInsight, row.content_id).map(|key| {
                    VoteTarget::resolve(Section::AiInsight, row.content_id, key, ledger)
                }),
            })
            .collect();

        let meme = sections.meme.as_ref().map(|card| Votable {
            row: card.clone(),
            target: Some(VoteTarget::resolve(
                Section::Meme,
                card.content_id,
                LedgerKey::section(Section::Meme),
                ledger,
            )),
        });

        Some(DashboardView {
            snapshot_id: snapshot.id,
            snapshot_date: snapshot.snapshot_date,
            visibility: self.visibility,
            news,
            prices: sections.prices.clone(),
            prices_vote,
            insights,
            meme,
            server_votes: snapshot.votes.clone(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "id": 11,
            "snapshotDate": "2024-05-01",
            "marketNews": { "BTC": { "contentId": 1, "data": { "results": [
                { "title": "A" }, { "title": "B" }
            ]}}},
            "coinPrices": { "BTC": { "contentId": 2, "data": { "usd": 1 } } },
            "aiInsight": {
                "BTC": { "contentId": 3, "data": { "summary": "calm" } },
                "ETH": { "data": { "summary": "no id" } }
            },
            "meme": { "DOGE": { "contentId": 4, "data": { "url": "https://m" } } }
        }))
        .unwrap()
    }

    #[test]
    fn test_view_requires_snapshot() {
        let vm = DashboardViewModel::new(RefreshPolicy::Refetch);
        assert!(vm.view(&VoteLedger::new()).is_none());
    }

    #[test]
    fn test_vote_states_follow_ledger() {
        let mut vm = DashboardViewModel::default();
        vm.replace_snapshot(snapshot());

        let mut ledger = VoteLedger::new();
        ledger.record_optimistic(LedgerKey::section(Section::CoinPrices), Vote::Down);
        ledger.record_optimistic(LedgerKey::item(Section::MarketNews, ContentId(1)), Vote::Up);

        let view = vm.view(&ledger).unwrap();
        assert_eq!(view.snapshot_id, 11);

        // Les deux news viennent du même asset : même clé, même état
        assert!(view
            .news
            .iter()
            .all(|n| n.target.as_ref().unwrap().state == VoteState::Locked(Vote::Up)));
        assert_eq!(view.prices_vote.as_ref().unwrap().state, VoteState::Locked(Vote::Down));
        assert!(view.insights[0].target.as_ref().unwrap().is_open());
        assert!(view.insights[1].target.is_none());

        let meme_target = view.meme.as_ref().unwrap().target.as_ref().unwrap();
        assert_eq!(meme_target.key.as_str(), "MEME-section");
        assert_eq!(meme_target.content_id, Some(ContentId(4)));
    }

    #[test]
    fn test_vote_targets_respect_visibility() {
        let mut vm = DashboardViewModel::default();
        vm.replace_snapshot(snapshot());
        vm.set_visibility(SectionVisibility {
            market_news: false,
            coin_prices: true,
            meme: false,
        });

        let view = vm.view(&VoteLedger::new()).unwrap();
        let sections: Vec<Section> = view.vote_targets().iter().map(|t| t.section).collect();
        assert_eq!(sections, vec![Section::CoinPrices, Section::AiInsight]);
    }

    #[test]
    fn test_insight_always_visible() {
        let prefs = Preferences::default();
        let visibility = SectionVisibility::from_preferences(&prefs);
        assert!(!visibility.shows(Section::MarketNews));
        assert!(visibility.shows(Section::AiInsight));
    }

    #[test]
    fn test_refresh_policy_parsing() {
        assert_eq!("refetch".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::Refetch);
        assert_eq!("Ledger-Only".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::LedgerOnly);
        assert!("sometimes".parse::<RefreshPolicy>().is_err());
    }
}
