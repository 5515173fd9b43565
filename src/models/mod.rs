// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données échangées avec le backend
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod preferences; // Préférences d'onboarding + options
pub mod section;     // Sections, ContentId, payloads bruts
pub mod snapshot;    // Snapshot quotidien du dashboard

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use hodlboard::models::snapshot::Snapshot;
// On peut faire : use hodlboard::models::Snapshot;
pub use preferences::{PreferenceOptions, Preferences, FALLBACK_ASSETS, FALLBACK_INVESTOR_TYPES};
pub use section::{ContentId, Section, SectionEntry, SectionPayload};
pub use snapshot::Snapshot;
