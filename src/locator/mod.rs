//! Pattern location: resolve a classifier-returned descriptor to one element
//!
//! The classifier quotes text that is not guaranteed to map onto any single
//! DOM node: it may be paraphrased, truncated, or span several nodes. The
//! locator runs a strict tier cascade from cheapest and most precise to most
//! expensive and least precise, stopping at the first hit:
//!
//! 1. exact key lookup
//! 2. selector hint
//! 3. sliding-window phrases (long windows first, exact before containment)
//! 4. significant words from the pattern text
//! 5. keywords from the pattern description (document-wide scan)
//! 6. fuzzy token-overlap scoring

pub mod descriptor;
pub mod matching;
pub mod selector;

pub use descriptor::PatternDescriptor;
pub use matching::{locate, Match, MatchTier};
