// ============================================================================
// Vote Ledger
// ============================================================================
// Mémorise, pour la session en cours, les votes déjà envoyés par
// l'utilisateur. Sert à :
// - afficher uniquement le vote choisi une fois l'item voté
// - empêcher un deuxième envoi pour le même item
//
// CONCEPTS RUST :
// 1. #[serde(into/try_from)] : un enum sérialisé comme un entier (-1, 0, 1)
// 2. TryFrom : conversion qui peut échouer
// 3. HashMap<K, V> : entry API pour un rollback conditionnel
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ContentId, Section};

/// Clé utilisée pour les votes qui portent sur une section entière
pub const SECTION_ITEM_KEY: &str = "section";

// ============================================================================
// Enum : Vote
// ============================================================================

/// Valeur d'un vote : pouce levé, neutre, pouce baissé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Vote {
    Up,
    Neutral,
    Down,
}

impl Vote {
    /// Valeur envoyée au backend
    pub fn value(&self) -> i8 {
        match self {
            Vote::Up => 1,
            Vote::Neutral => 0,
            Vote::Down => -1,
        }
    }

    /// Pictogramme affiché dans le terminal
    pub fn symbol(&self) -> &'static str {
        match self {
            Vote::Up => "👍",
            Vote::Neutral => "😐",
            Vote::Down => "👎",
        }
    }
}

impl From<Vote> for i8 {
    fn from(vote: Vote) -> Self {
        vote.value()
    }
}

impl TryFrom<i8> for Vote {
    type Error = anyhow::Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Vote::Up),
            0 => Ok(Vote::Neutral),
            -1 => Ok(Vote::Down),
            other => Err(anyhow!("Vote must be -1, 0, or 1 (got {})", other)),
        }
    }
}

impl TryFrom<i64> for Vote {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let small = i8::try_from(value).map_err(|_| anyhow!("Vote out of range: {}", value))?;
        Vote::try_from(small)
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ============================================================================
// Structure : LedgerKey
// ============================================================================

/// Clé composite `SECTION-itemKey`
///
/// itemKey = contentId de l'item, ou `section` pour un vote de section
/// (bloc des prix, meme du jour).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey(String);

impl LedgerKey {
    /// Clé pour un item identifié par son contentId
    pub fn item(section: Section, content_id: ContentId) -> Self {
        Self(format!("{}-{}", section.as_str(), content_id))
    }

    /// Clé pour un vote qui porte sur toute la section
    pub fn section(section: Section) -> Self {
        Self(format!("{}-{}", section.as_str(), SECTION_ITEM_KEY))
    }

    /// Clé pour un item, ou None s'il n'a pas de contentId
    pub fn for_item(section: Section, content_id: Option<ContentId>) -> Option<Self> {
        content_id.map(|id| Self::item(section, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Structure : VoteLedger
// ============================================================================

/// Table en mémoire clé -> vote choisi
///
/// `record_optimistic` écrit sans condition : c'est l'appelant (la session)
/// qui vérifie `has` avant d'enregistrer, ce qui rend la table
/// append-only par clé jusqu'au prochain `clear`.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: HashMap<LedgerKey, Vote>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre le vote immédiatement, avant la réponse du backend
    pub fn record_optimistic(&mut self, key: LedgerKey, vote: Vote) {
        debug!(key = %key, vote = %vote, "Recording optimistic vote");
        self.votes.insert(key, vote);
    }

    /// Retire l'entrée seulement si elle vaut encore `vote`
    ///
    /// Un rollback tardif ne doit jamais effacer une valeur plus récente.
    /// Retourne true si l'entrée a été retirée.
    pub fn rollback(&mut self, key: &LedgerKey, vote: Vote) -> bool {
        match self.votes.get(key) {
            Some(current) if *current == vote => {
                self.votes.remove(key);
                debug!(key = %key, vote = %vote, "Rolled back vote");
                true
            }
            Some(current) => {
                debug!(key = %key, stale = %vote, current = %current, "Ignoring stale rollback");
                false
            }
            None => false,
        }
    }

    /// Un vote est-il déjà verrouillé pour cette clé ?
    pub fn has(&self, key: &LedgerKey) -> bool {
        self.votes.contains_key(key)
    }

    /// Vote enregistré pour cette clé
    pub fn get(&self, key: &LedgerKey) -> Option<Vote> {
        self.votes.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Vide la table (logout)
    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> LedgerKey {
        LedgerKey::item(Section::MarketNews, ContentId(42))
    }

    #[test]
    fn test_key_format() {
        assert_eq!(key().as_str(), "MARKET_NEWS-42");
        assert_eq!(LedgerKey::section(Section::CoinPrices).as_str(), "COIN_PRICES-section");
        assert!(LedgerKey::for_item(Section::AiInsight, None).is_none());
    }

    #[test]
    fn test_vote_wire_format() {
        assert_eq!(serde_json::to_value(Vote::Down).unwrap(), json!(-1));
        let vote: Vote = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(vote, Vote::Up);
        assert!(serde_json::from_value::<Vote>(json!(2)).is_err());
        assert!(Vote::try_from(300_i64).is_err());
    }

    #[test]
    fn test_record_then_rollback() {
        let mut ledger = VoteLedger::new();
        ledger.record_optimistic(key(), Vote::Up);
        assert!(ledger.has(&key()));

        assert!(ledger.rollback(&key(), Vote::Up));
        assert!(!ledger.has(&key()));
    }

    #[test]
    fn test_stale_rollback_keeps_newer_vote() {
        let mut ledger = VoteLedger::new();
        ledger.record_optimistic(key(), Vote::Up);
        ledger.record_optimistic(key(), Vote::Down);

        assert!(!ledger.rollback(&key(), Vote::Up));
        assert!(ledger.has(&key()));
        assert_eq!(ledger.get(&key()), Some(Vote::Down));
    }

    #[test]
    fn test_rollback_missing_key() {
        let mut ledger = VoteLedger::new();
        assert!(!ledger.rollback(&key(), Vote::Neutral));
        assert!(ledger.is_empty());
    }
}
