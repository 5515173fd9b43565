// ============================================================================
// Normalizer : Market News
// ============================================================================
// Aplatit les listes d'articles de tous les assets en une seule liste
// affichable : dédupliquée par titre, limitée à MAX_NEWS_ITEMS.
//
// Entrée : { "BTC": { contentId, data: { results: [ {title, url, ...} ] } } }
// ============================================================================

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::models::{ContentId, SectionPayload};
use crate::normalize::fallback::{first_text, FieldChain};

/// Nombre maximum d'articles affichés
pub const MAX_NEWS_ITEMS: usize = 6;

const TITLE: FieldChain = &["title", "title_text"];
const DESCRIPTION: FieldChain = &["description", "body"];
const URL: FieldChain = &["url", "original_url"];
const PUBLISHED_AT: FieldChain = &["published_at", "publishedAt", "created_at"];

/// Un article prêt à afficher
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRow {
    /// Clé stable `titre-index` (index dans la liste aplatie)
    pub key: String,
    pub asset: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    /// contentId de l'asset (pas de l'article)
    pub content_id: Option<ContentId>,
}

/// Normalise la section news
///
/// L'ordre suit l'itération du mapping puis l'ordre des listes. La coupe à
/// MAX_NEWS_ITEMS se fait après la collecte complète.
pub fn normalize_news(payload: &SectionPayload) -> Vec<NewsRow> {
    let flattened = payload.iter().flat_map(|(asset, entry)| {
        results_of(&entry.data)
            .iter()
            .map(move |article| (asset, entry.content_id, article))
    });

    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();
    let mut untitled = 0usize;

    for (index, (asset, content_id, article)) in flattened.enumerate() {
        let title = match first_text(article, TITLE) {
            Some(title) => title,
            None => {
                untitled += 1;
                continue;
            }
        };

        // CONCEPT RUST : HashSet::insert retourne false si déjà présent
        if !seen_titles.insert(title.to_string()) {
            continue;
        }

        rows.push(NewsRow {
            key: format!("{}-{}", title, index),
            asset: asset.to_string(),
            title: title.to_string(),
            description: first_text(article, DESCRIPTION).map(str::to_string),
            url: first_text(article, URL).map(str::to_string),
            published_at: first_text(article, PUBLISHED_AT).map(str::to_string),
            content_id,
        });
    }

    if untitled > 0 {
        debug!(untitled, "Dropped news items without a title");
    }

    rows.truncate(MAX_NEWS_ITEMS);
    rows
}

/// Liste `data.results`, vide si absente ou mal formée
fn results_of(data: &Value) -> &[Value] {
    data.get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> SectionPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_and_dedup() {
        let news = payload(json!({
            "BTC": { "contentId": 1, "data": { "results": [
                { "title": "ETF approved", "url": "https://a" },
                { "title_text": "Miners rally" },
                { "description": "no title here" }
            ]}},
            "ETH": { "contentId": 2, "data": { "results": [
                { "title": "ETF approved" },
                { "title": "Gas fees drop", "published_at": "2024-05-01T10:00:00Z" }
            ]}}
        }));

        let rows = normalize_news(&news);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["ETF approved", "Miners rally", "Gas fees drop"]);

        assert_eq!(rows[0].key, "ETF approved-0");
        assert_eq!(rows[0].url.as_deref(), Some("https://a"));
        assert_eq!(rows[2].key, "Gas fees drop-4");
        assert_eq!(rows[2].asset, "ETH");
        assert_eq!(rows[2].content_id, Some(ContentId(2)));
        assert_eq!(rows[2].published_at.as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn test_titles_kept_verbatim() {
        let news = payload(json!({
            "BTC": { "contentId": 1, "data": { "results": [
                { "title": "   " },
                { "title": " ETF approved " },
                { "title": "ETF approved" }
            ]}}
        }));

        let rows = normalize_news(&news);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        // Titre blanc ignoré ; les deux autres diffèrent par leurs espaces
        assert_eq!(titles, vec![" ETF approved ", "ETF approved"]);
        assert_eq!(rows[0].key, " ETF approved -1");
    }

    #[test]
    fn test_capped_at_six() {
        let results: Vec<Value> = (0..10).map(|i| json!({ "title": format!("Story {}", i) })).collect();
        let news = payload(json!({ "BTC": { "contentId": 1, "data": { "results": results } } }));

        let rows = normalize_news(&news);
        assert_eq!(rows.len(), MAX_NEWS_ITEMS);
        assert_eq!(rows.last().unwrap().title, "Story 5");
    }

    #[test]
    fn test_malformed_results() {
        let news = payload(json!({
            "BTC": { "data": { "results": "oops" } },
            "ETH": { "data": null }
        }));
        assert!(normalize_news(&news).is_empty());
    }
}
