// ============================================================================
// Chaînes de repli (fallback chains)
// ============================================================================
// Les payloads du backend sont peu typés : un même champ peut s'appeler
// `title` ou `title_text`, un prix `usd` ou `price`. Chaque normalizer
// déclare une liste ordonnée de champs ; le premier présent gagne.
//
// CONCEPTS RUST :
// 1. Slices de &str : listes constantes de noms de champs
// 2. Iterator::find_map : premier élément qui produit Some(...)
// 3. Option chaining : get() -> and_then() -> filter()
//
// Les valeurs sont renvoyées telles quelles : aucun trim, aucune conversion.
// ============================================================================

use serde_json::Value;

/// Liste ordonnée de champs candidats
pub type FieldChain = &'static [&'static str];

/// Premier champ texte non blanc de la chaîne, renvoyé sans modification
///
/// Un texte fait uniquement d'espaces compte comme absent, mais le texte
/// retenu garde ses espaces d'origine.
pub fn first_text<'a>(record: &'a Value, chain: FieldChain) -> Option<&'a str> {
    chain.iter().find_map(|field| {
        record
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    })
}

/// Premier champ présent et non null, quel que soit son type
///
/// Un `"n/a"` dans le premier champ l'emporte sur un nombre dans le suivant.
pub fn first_present<'a>(record: &'a Value, chain: FieldChain) -> Option<&'a Value> {
    chain
        .iter()
        .find_map(|field| record.get(field).filter(|v| !v.is_null()))
}
