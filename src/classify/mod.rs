//! Dark-pattern classification via the Gemini API
//!
//! The classifier is an external collaborator: it receives the page's
//! flattened visible text and returns pattern descriptors. Transport and
//! credential failures are surfaced as typed errors and never retried;
//! unparsable model output degrades to an empty pattern list so a flaky
//! response costs recall, not the whole scan.

pub mod gemini;
pub mod parse;

pub use gemini::{GeminiClassifier, DEFAULT_MODEL};
pub use parse::parse_patterns;
