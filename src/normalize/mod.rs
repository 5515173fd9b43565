// ============================================================================
// Module : normalize
// ============================================================================
// Fonctions pures qui transforment les payloads bruts du snapshot en lignes
// affichables, une par section.
// ============================================================================

pub mod fallback; // Chaînes de champs candidats (premier trouvé gagne)
pub mod insight;  // AI insight
pub mod meme;     // Meme du jour
pub mod news;     // Market news
pub mod prices;   // Coin prices

pub use insight::{normalize_insights, strip_asset_prefix, InsightRow, NO_SUMMARY};
pub use meme::{normalize_meme, sanitize_meme_url, MemeCard, FALLBACK_MEME_URL};
pub use news::{normalize_news, NewsRow, MAX_NEWS_ITEMS};
pub use prices::{normalize_prices, Price, PriceRow, PRICE_PLACEHOLDER};
