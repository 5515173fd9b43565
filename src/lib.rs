// ============================================================================
// HodlBoard - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Client HTTP du backend advisor
pub mod app;        // État de l'application TUI
pub mod config;     // Configuration (env + .env)
pub mod ledger;     // Ledger local des votes
pub mod models;     // Structures de données (snapshot, préférences)
pub mod normalize;  // Normalisation des payloads de section
pub mod session;    // Contexte de session (auth, votes, routing)
pub mod ui;         // Interface utilisateur
pub mod view_model; // Vue calculée du dashboard
