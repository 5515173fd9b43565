// ============================================================================
// Normalizer : Coin Prices
// ============================================================================
// Une ligne par asset, sans filtre ni dédoublonnage.
// Prix : data.usd -> data.price -> "?" (premier champ non null)
// ============================================================================

use std::fmt;

use crate::models::SectionPayload;
use serde_json::Value;

use crate::normalize::fallback::{first_present, FieldChain};

const PRICE: FieldChain = &["usd", "price"];

/// Texte affiché quand aucun prix n'est disponible
pub const PRICE_PLACEHOLDER: &str = "?";

/// Prix d'un asset
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    /// Prix en USD
    Quoted(f64),
    /// Valeur non numérique envoyée par le backend, affichée telle quelle
    Raw(String),
    /// Ni `usd` ni `price` dans le payload
    Unavailable,
}

impl Price {
    /// Interprète la valeur retenue par la chaîne de repli
    ///
    /// Les nombres et les textes numériques (`"3100"`) sont des prix ; tout
    /// autre texte est gardé tel quel.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(Price::Quoted)
                .unwrap_or_else(|| Price::Raw(n.to_string())),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Price::Quoted(parsed),
                _ => Price::Raw(s.clone()),
            },
            other => Price::Raw(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Price::Quoted(value) => Some(*value),
            Price::Raw(_) | Price::Unavailable => None,
        }
    }
}

impl fmt::Display for Price {
    /// Format : "$65000.00", ou "?" si inconnu
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Quoted(value) if value.abs() < 1.0 => write!(f, "${:.4}", value),
            Price::Quoted(value) => write!(f, "${:.2}", value),
            Price::Raw(text) => f.write_str(text),
            Price::Unavailable => f.write_str(PRICE_PLACEHOLDER),
        }
    }
}

/// Une ligne du bloc des prix
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub asset: String,
    pub price: Price,
}

/// Normalise la section prix : exactement une ligne par clé d'asset
pub fn normalize_prices(payload: &SectionPayload) -> Vec<PriceRow> {
    payload
        .iter()
        .map(|(asset, entry)| PriceRow {
            asset: asset.to_string(),
            price: first_present(&entry.data, PRICE)
                .map(Price::from_value)
                .unwrap_or(Price::Unavailable),
        })
        .collect()
}
