// ============================================================================
// Normalizer : Meme du jour
// ============================================================================
// Seule la première entrée du payload compte (un meme par jour). L'URL est
// filtrée : seuls "http..." et "data:image/..." passent, tout le reste est
// remplacé par une image SVG intégrée.
// ============================================================================

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{ContentId, SectionPayload};
use crate::normalize::fallback::{first_text, FieldChain};

const TITLE: FieldChain = &["title", "caption"];

/// Préfixes d'URL acceptés
pub const ALLOWED_URL_PREFIXES: [&str; 2] = ["http", "data:image/"];

/// Image de remplacement (SVG en data URI)
pub const FALLBACK_MEME_URL: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='800' height='480'><rect width='100%' height='100%' fill='%230f172a'/><text x='50%' y='50%' fill='%23e2e8f0' font-size='44' font-family='Segoe UI, Arial' text-anchor='middle'>HODL vibes</text></svg>";

/// Le meme du jour prêt à afficher
#[derive(Debug, Clone, PartialEq)]
pub struct MemeCard {
    pub asset: String,
    pub title: Option<String>,
    /// URL validée (jamais vide, jamais hors allow-list)
    pub url: String,
    /// Champs bruts de `data`, avec `url` remplacée par la valeur validée
    pub fields: Map<String, Value>,
    pub content_id: Option<ContentId>,
}

/// Normalise la section meme : None s'il n'y a aucune entrée
pub fn normalize_meme(payload: &SectionPayload) -> Option<MemeCard> {
    let (asset, entry) = payload.first()?;

    let raw_url = entry.data.get("url").and_then(Value::as_str);
    let url = sanitize_meme_url(raw_url);
    if raw_url != Some(url) {
        warn!(asset = %asset, raw_url = ?raw_url, "Replacing unsafe or missing meme URL");
    }

    let mut fields = entry.data.as_object().cloned().unwrap_or_default();
    fields.insert("url".to_string(), Value::String(url.to_string()));

    Some(MemeCard {
        asset: asset.to_string(),
        title: first_text(&entry.data, TITLE).map(str::to_string),
        url: url.to_string(),
        fields,
        content_id: entry.content_id,
    })
}

/// Retourne l'URL si elle est dans l'allow-list, sinon l'image de secours
pub fn sanitize_meme_url(url: Option<&str>) -> &str {
    match url {
        Some(u) if ALLOWED_URL_PREFIXES.iter().any(|prefix| u.starts_with(prefix)) => u,
        _ => FALLBACK_MEME_URL,
    }
}
