// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client du backend Crypto Advisor (auth, préférences,
// dashboard, votes)
// ============================================================================

pub mod client; // Client HTTP + trait AdvisorApi

// Re-export des types principaux
pub use client::{AdvisorApi, Credentials, HttpAdvisorClient, LoginResponse, VoteRequest};
