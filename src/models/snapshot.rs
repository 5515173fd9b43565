// ============================================================================
// Structure : Snapshot
// ============================================================================
// Le contenu quotidien pré-calculé par le backend (GET /api/dashboard/today)
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : snapshotDate -> snapshot_date
// 2. #[serde(default)] : champ absent => valeur par défaut
// 3. deserialize_with : décodage sur mesure d'un seul champ
// ============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ledger::Vote;
use crate::models::section::{Section, SectionPayload};

/// Un snapshot du dashboard, immuable une fois reçu
///
/// Il est remplacé en bloc à chaque rafraîchissement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Identifiant du snapshot (utilisé dans l'URL de vote)
    pub id: i64,

    /// Date du snapshot (None si le backend envoie une date illisible)
    #[serde(default, deserialize_with = "lenient_date")]
    pub snapshot_date: Option<NaiveDate>,

    #[serde(default)]
    pub market_news: SectionPayload,

    #[serde(default)]
    pub coin_prices: SectionPayload,

    #[serde(default)]
    pub ai_insight: SectionPayload,

    #[serde(default)]
    pub meme: SectionPayload,

    /// Dernier vote enregistré côté backend, par section
    #[serde(default, deserialize_with = "lenient_votes")]
    pub votes: BTreeMap<Section, Vote>,
}

impl Snapshot {
    /// Crée un snapshot vide (utile pour les tests et l'état initial)
    pub fn new(id: i64) -> Self {
        Self {
            id,
            snapshot_date: None,
            market_news: SectionPayload::empty(),
            coin_prices: SectionPayload::empty(),
            ai_insight: SectionPayload::empty(),
            meme: SectionPayload::empty(),
            votes: BTreeMap::new(),
        }
    }

    /// Retourne le payload brut d'une section
    pub fn payload(&self, section: Section) -> &SectionPayload {
        match section {
            Section::MarketNews => &self.market_news,
            Section::CoinPrices => &self.coin_prices,
            Section::AiInsight => &self.ai_insight,
            Section::Meme => &self.meme,
        }
    }
}

/// Date ISO (`2024-05-01`) ou rien
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// Table section -> vote ; les sections ou votes inconnus sont ignorés
fn lenient_votes<'de, D>(deserializer: D) -> Result<BTreeMap<Section, Vote>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let mut votes = BTreeMap::new();

    if let Some(Value::Object(map)) = raw {
        for (name, value) in map {
            let section = Section::from_wire(&name);
            let vote = value.as_i64().and_then(|v| Vote::try_from(v).ok());
            if let (Some(section), Some(vote)) = (section, vote) {
                votes.insert(section, vote);
            }
        }
    }

    Ok(votes)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_decoding() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "id": 7,
            "snapshotDate": "2024-05-01",
            "marketNews": { "BTC": { "contentId": 1, "data": { "results": [] } } },
            "coinPrices": { "BTC": { "contentId": 2, "data": { "usd": 65000 } } },
            "aiInsight": {},
            "meme": null,
            "votes": { "MEME": 1, "COIN_PRICES": -1, "BOGUS": 1, "AI_INSIGHT": 5 }
        }))
        .unwrap();

        assert_eq!(snapshot.id, 7);
        assert_eq!(snapshot.snapshot_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(snapshot.market_news.len(), 1);
        assert!(snapshot.ai_insight.is_empty());
        assert!(snapshot.meme.is_empty());
        assert_eq!(snapshot.votes.len(), 2);
        assert_eq!(snapshot.votes.get(&Section::Meme), Some(&Vote::Up));
        assert_eq!(snapshot.votes.get(&Section::CoinPrices), Some(&Vote::Down));
    }

    #[test]
    fn test_snapshot_missing_sections() {
        let snapshot: Snapshot = serde_json::from_value(json!({ "id": 3 })).unwrap();
        assert!(snapshot.snapshot_date.is_none());
        assert!(snapshot.payload(Section::CoinPrices).is_empty());
        assert!(snapshot.votes.is_empty());
    }
}
