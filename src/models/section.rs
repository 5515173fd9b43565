// ============================================================================
// Sections et payloads bruts
// ============================================================================
// Le backend renvoie chaque section du dashboard sous forme d'objet JSON :
//   { "BTC": { "contentId": 12, "data": { ... } }, "ETH": { ... } }
//
// CONCEPTS RUST :
// 1. #[serde(from = "...")] : décodage défensif en deux temps (Value -> type)
// 2. Newtype pattern : ContentId enveloppe un i64
// 3. Vec<(K, V)> : mapping ordonné (l'ordre du backend compte pour le meme)
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Enum : Section
// ============================================================================

/// Les quatre catégories de contenu du dashboard
///
/// Les noms sérialisés sont ceux du backend (`MARKET_NEWS`, ...), réutilisés
/// tels quels dans les clés du ledger de votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    MarketNews,
    CoinPrices,
    AiInsight,
    Meme,
}

impl Section {
    /// Toutes les sections, dans l'ordre d'affichage
    pub const ALL: [Section; 4] = [
        Section::MarketNews,
        Section::CoinPrices,
        Section::AiInsight,
        Section::Meme,
    ];

    /// Nom côté backend (identique à la forme sérialisée)
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::MarketNews => "MARKET_NEWS",
            Section::CoinPrices => "COIN_PRICES",
            Section::AiInsight => "AI_INSIGHT",
            Section::Meme => "MEME",
        }
    }

    /// Titre affiché dans l'interface
    pub fn title(&self) -> &'static str {
        match self {
            Section::MarketNews => "Market News",
            Section::CoinPrices => "Prices",
            Section::AiInsight => "AI Insight",
            Section::Meme => "Meme",
        }
    }

    /// Parse le nom backend, None si inconnu
    pub fn from_wire(name: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ContentId
// ============================================================================

/// Identifiant attribué par le backend à un contenu votable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl ContentId {
    /// Lit un identifiant depuis une valeur JSON quelconque
    ///
    /// Accepte un nombre entier ou une chaîne numérique, tout le reste
    /// (null, objet, texte libre) est considéré comme absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ContentId),
            Value::String(s) => s.trim().parse().ok().map(ContentId),
            _ => None,
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SectionEntry / SectionPayload
// ============================================================================

/// Une entrée d'une section : l'identifiant votable + les données brutes
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntry {
    pub content_id: Option<ContentId>,
    pub data: Value,
}

impl SectionEntry {
    /// Décode une entrée `{ contentId, data }`
    ///
    /// Si le champ `data` est absent, l'entrée entière sert de données
    /// (anciens snapshots sans enveloppe).
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let content_id = map.get("contentId").and_then(ContentId::from_value);
                let data = match map.remove("data") {
                    Some(data) => data,
                    None => Value::Object(map),
                };
                Self { content_id, data }
            }
            other => Self {
                content_id: None,
                data: other,
            },
        }
    }
}

/// Mapping ordonné symbole d'asset -> entrée
///
/// CONCEPT RUST : #[serde(from = "Value")]
/// - serde désérialise d'abord une Value quelconque
/// - puis appelle From<Value> : le décodage ne peut jamais échouer
/// - null, tableau ou texte donnent une section vide
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct SectionPayload {
    entries: Vec<(String, SectionEntry)>,
}

impl SectionPayload {
    /// Payload vide
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construit un payload à partir d'entrées déjà décodées
    pub fn from_entries(entries: Vec<(String, SectionEntry)>) -> Self {
        Self { entries }
    }

    /// Itère sur (asset, entrée) dans l'ordre du backend
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionEntry)> {
        self.entries.iter().map(|(asset, entry)| (asset.as_str(), entry))
    }

    /// Première entrée (utilisée par la section meme)
    pub fn first(&self) -> Option<(&str, &SectionEntry)> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Value> for SectionPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map),
            _ => Self::empty(),
        }
    }
}

impl From<Map<String, Value>> for SectionPayload {
    fn from(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(asset, raw)| (asset, SectionEntry::from_value(raw)))
            .collect();
        Self { entries }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_wire_names() {
        assert_eq!(Section::MarketNews.as_str(), "MARKET_NEWS");
        assert_eq!(
            serde_json::to_value(Section::CoinPrices).unwrap(),
            json!("COIN_PRICES")
        );
        assert_eq!(Section::from_wire("AI_INSIGHT"), Some(Section::AiInsight));
        assert_eq!(Section::from_wire("ai_insight"), None);
    }

    #[test]
    fn test_content_id_tolerance() {
        assert_eq!(ContentId::from_value(&json!(42)), Some(ContentId(42)));
        assert_eq!(ContentId::from_value(&json!("17")), Some(ContentId(17)));
        assert_eq!(ContentId::from_value(&json!("abc")), None);
        assert_eq!(ContentId::from_value(&json!(null)), None);
        assert_eq!(ContentId::from_value(&json!(1.5)), None);
    }

    #[test]
    fn test_payload_preserves_backend_order() {
        let payload: SectionPayload = serde_json::from_value(json!({
            "SOL": { "contentId": 3, "data": { "usd": 150 } },
            "BTC": { "contentId": 1, "data": { "usd": 65000 } },
        }))
        .unwrap();

        let assets: Vec<&str> = payload.iter().map(|(a, _)| a).collect();
        assert_eq!(assets, vec!["SOL", "BTC"]);
        assert_eq!(payload.first().unwrap().1.content_id, Some(ContentId(3)));
    }

    #[test]
    fn test_entry_without_data_envelope() {
        let entry = SectionEntry::from_value(json!({ "contentId": 9, "usd": 1.0 }));
        assert_eq!(entry.content_id, Some(ContentId(9)));
        assert_eq!(entry.data["usd"], json!(1.0));
    }

    #[test]
    fn test_null_payload_is_empty() {
        let payload: SectionPayload = serde_json::from_value(json!(null)).unwrap();
        assert!(payload.is_empty());
    }
}
