// ============================================================================
// Normalizer : AI Insight
// ============================================================================
// Une ligne par asset. Résumé : summary -> headline -> texte par défaut,
// puis suppression du préfixe généré "hodler note on {asset}:".
// ============================================================================

use crate::models::{ContentId, SectionPayload};
use crate::normalize::fallback::{first_text, FieldChain};

const SUMMARY: FieldChain = &["summary", "headline"];

/// Texte utilisé quand ni summary ni headline ne sont présents
pub const NO_SUMMARY: &str = "No summary available";

/// Une ligne de la section AI insight
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRow {
    pub asset: String,
    pub summary: String,
    pub content_id: Option<ContentId>,
}

/// Normalise la section AI insight
///
/// Un payload vide donne une liste vide ; la vue affiche alors un état
/// "no insight" explicite.
pub fn normalize_insights(payload: &SectionPayload) -> Vec<InsightRow> {
    payload
        .iter()
        .map(|(asset, entry)| {
            let raw = first_text(&entry.data, SUMMARY).unwrap_or(NO_SUMMARY);
            InsightRow {
                asset: asset.to_string(),
                summary: strip_asset_prefix(raw, asset).to_string(),
                content_id: entry.content_id,
            }
        })
        .collect()
}

/// Retire le préfixe "hodler note on {asset}:" en début de texte
///
/// Comparaison insensible à la casse, ancrée au début. Si le texte ne
/// commence pas par ce préfixe il est renvoyé tel quel.
pub fn strip_asset_prefix<'a>(summary: &'a str, asset: &str) -> &'a str {
    let pattern = format!("hodler note on {}:", asset);

    // CONCEPT RUST : char_indices
    // - On avance caractère par caractère dans les deux chaînes
    // - to_lowercase() peut produire plusieurs chars : on compare les itérateurs
    let mut text = summary.char_indices();
    for expected in pattern.chars() {
        match text.next() {
            Some((_, actual)) if actual.to_lowercase().eq(expected.to_lowercase()) => {}
            _ => return summary,
        }
    }

    let rest = match text.next() {
        Some((offset, _)) => &summary[offset..],
        None => "",
    };
    rest.trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_stripped_case_insensitive() {
        assert_eq!(
            strip_asset_prefix("HODLER note on bitcoin: Range-trading regime.", "bitcoin"),
            "Range-trading regime."
        );
        assert_eq!(
            strip_asset_prefix("Hodler Note On BTC:watch fees", "btc"),
            "watch fees"
        );
    }

    #[test]
    fn test_prefix_untouched_when_absent() {
        let text = "Daily note on bitcoin: calm markets";
        assert_eq!(strip_asset_prefix(text, "bitcoin"), text);

        // Préfixe d'un autre asset : inchangé
        let other = "HODLER note on ethereum: gas rising";
        assert_eq!(strip_asset_prefix(other, "bitcoin"), other);

        // Préfixe au milieu du texte : inchangé
        let middle = "Today: hodler note on bitcoin: x";
        assert_eq!(strip_asset_prefix(middle, "bitcoin"), middle);
    }

    #[test]
    fn test_summary_fallback_chain() {
        let payload: SectionPayload = serde_json::from_value(json!({
            "bitcoin": { "contentId": 5, "data": { "summary": "HODLER note on bitcoin: Stay calm." } },
            "ethereum": { "contentId": 6, "data": { "headline": "Daily insight for ethereum" } },
            "solana": { "data": {} }
        }))
        .unwrap();

        let rows = normalize_insights(&payload);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].summary, "Stay calm.");
        assert_eq!(rows[0].content_id, Some(ContentId(5)));
        assert_eq!(rows[1].summary, "Daily insight for ethereum");
        assert_eq!(rows[2].summary, NO_SUMMARY);
        assert!(rows[2].content_id.is_none());
    }

    #[test]
    fn test_summary_text_not_rewritten() {
        let payload: SectionPayload = serde_json::from_value(json!({
            "BTC": { "data": { "summary": "  calm markets \n" } },
            "ETH": { "data": { "summary": " HODLER note on ETH: gas" } }
        }))
        .unwrap();

        let rows = normalize_insights(&payload);
        assert_eq!(rows[0].summary, "  calm markets \n");
        // Espace avant le préfixe : il n'est plus en tête, donc conservé
        assert_eq!(rows[1].summary, " HODLER note on ETH: gas");
    }

    #[test]
    fn test_empty_payload() {
        assert!(normalize_insights(&SectionPayload::empty()).is_empty());
    }
}
