use crate::locator::descriptor::PatternDescriptor;
use crate::locator::selector;
use crate::page::{TextIndex, VisibleElement};
use std::collections::HashSet;

/// Longest phrase window tried in the sliding-window tier
pub const PHRASE_WINDOW_MAX: usize = 5;

/// Shortest phrase window tried in the sliding-window tier
pub const PHRASE_WINDOW_MIN: usize = 2;

/// Phrases of this many characters or fewer are too generic to try
pub const PHRASE_MIN_CHARS: usize = 5;

/// Pattern-text tokens must be longer than this to count as significant
pub const WORD_MIN_CHARS: usize = 5;

/// Description tokens must be longer than this to be used as keywords
pub const DESC_KEYWORD_MIN_CHARS: usize = 6;

/// Fuzzy scoring only counts shared tokens longer than this
pub const FUZZY_TOKEN_MIN_CHARS: usize = 3;

/// A fuzzy candidate is accepted only with a score strictly above this
pub const FUZZY_SCORE_THRESHOLD: usize = 10;

/// Upper bound on elements scanned per description keyword. The keyword tier
/// re-scans the whole document per keyword, which is O(pageSize x keywords)
/// on pathological pages; the cap keeps it bounded.
pub const KEYWORD_SCAN_CAP: usize = 4096;

/// Which strategy produced a match (diagnostic)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    ExactText,
    Selector,
    Phrase,
    SignificantWord,
    DescriptionKeyword,
    FuzzyOverlap,
}

/// A resolved pattern: the owning element plus the tier that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Position of the element in the snapshot's element list
    pub element: usize,

    /// Strategy that produced the hit
    pub tier: MatchTier,
}

/// Resolve a pattern descriptor to the single best-matching element.
///
/// Each tier is attempted only if every previous tier produced nothing, and a
/// tier stops at its first hit. Returns `None` when all six tiers miss.
pub fn locate(pattern: &PatternDescriptor, index: &TextIndex, elements: &[VisibleElement]) -> Option<Match> {
    // 1. Exact key lookup on the quoted text, verbatim
    if !pattern.text.is_empty() {
        if let Some(element) = index.get(&pattern.text) {
            log::debug!("Matched '{}' by exact text", pattern.pattern_type);
            return Some(Match { element, tier: MatchTier::ExactText });
        }
    }

    // 2. Selector hint; unparsable selectors are misses, never errors
    if let Some(hint) = pattern.selector_hint() {
        if let Some(element) = selector::query(hint, elements) {
            log::debug!("Matched '{}' by selector {}", pattern.pattern_type, hint);
            return Some(Match { element, tier: MatchTier::Selector });
        }
    }

    if !pattern.text.is_empty() {
        let words: Vec<&str> = pattern.text.trim().split_whitespace().collect();

        // 3. Sliding-window phrases, longest (most specific) windows first.
        // Within one phrase, an exact key hit beats substring containment.
        let longest = PHRASE_WINDOW_MAX.min(words.len());
        for len in (PHRASE_WINDOW_MIN..=longest).rev() {
            for start in 0..=words.len() - len {
                let phrase = words[start..start + len].join(" ");
                if phrase.len() <= PHRASE_MIN_CHARS {
                    continue;
                }

                if let Some(element) = index.get(&phrase) {
                    log::debug!("Matched '{}' by phrase key '{}'", pattern.pattern_type, phrase);
                    return Some(Match { element, tier: MatchTier::Phrase });
                }

                for (key, element) in index.iter() {
                    if key.contains(&phrase) {
                        log::debug!("Matched '{}' by phrase containment '{}'", pattern.pattern_type, phrase);
                        return Some(Match { element, tier: MatchTier::Phrase });
                    }
                }
            }
        }

        // 4. Significant words from the quoted text, in original order
        for word in words.iter().filter(|w| w.len() > WORD_MIN_CHARS) {
            for (key, element) in index.iter() {
                if key.contains(*word) {
                    log::debug!("Matched '{}' by word '{}'", pattern.pattern_type, word);
                    return Some(Match { element, tier: MatchTier::SignificantWord });
                }
            }
        }
    }

    // 5. Keywords from the description; full-document scan per keyword,
    // bounded and early-exiting. Fallback of last structural resort.
    if !pattern.description.is_empty() {
        for keyword in pattern.description.split_whitespace().filter(|w| w.len() > DESC_KEYWORD_MIN_CHARS) {
            for (element, info) in elements.iter().enumerate().take(KEYWORD_SCAN_CAP) {
                if info.text.contains(keyword) {
                    log::debug!("Matched '{}' by description keyword '{}'", pattern.pattern_type, keyword);
                    return Some(Match { element, tier: MatchTier::DescriptionKeyword });
                }
            }
        }
    }

    // 6. Fuzzy overlap: score every key by the summed length of tokens it
    // shares with the quoted text, accept only a score strictly above the
    // threshold. Ties keep the earliest candidate.
    if !pattern.text.is_empty() {
        let text = pattern.text.to_lowercase();
        let wanted: HashSet<&str> = text.split_whitespace().collect();

        let mut best = None;
        let mut best_score = 0usize;

        for (key, element) in index.iter() {
            let key_lower = key.to_lowercase();
            let score: usize = key_lower
                .split_whitespace()
                .filter(|w| w.len() > FUZZY_TOKEN_MIN_CHARS && wanted.contains(w))
                .map(str::len)
                .sum();

            if score > best_score {
                best_score = score;
                best = Some(element);
            }
        }

        if best_score > FUZZY_SCORE_THRESHOLD {
            if let Some(element) = best {
                log::debug!("Matched '{}' by fuzzy overlap, score {}", pattern.pattern_type, best_score);
                return Some(Match { element, tier: MatchTier::FuzzyOverlap });
            }
        }
    }

    log::debug!("No element found for pattern '{}'", pattern.pattern_type);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(texts: &[&str]) -> (TextIndex, Vec<VisibleElement>) {
        let elements: Vec<VisibleElement> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| VisibleElement::new("p", *text, format!("body > p:nth-child({})", i + 1)))
            .collect();
        let index = TextIndex::build(&elements);
        (index, elements)
    }

    fn pattern(text: &str) -> PatternDescriptor {
        PatternDescriptor::new(text, "Urgency", "Creates false scarcity to pressure purchase")
    }

    #[test]
    fn test_tier1_exact_text() {
        let (index, elements) = page(&["Welcome to the shop", "Only 2 items left in stock!"]);

        let m = locate(&pattern("Only 2 items left in stock!"), &index, &elements).unwrap();
        assert_eq!(m.element, 1);
        assert_eq!(m.tier, MatchTier::ExactText);
    }

    #[test]
    fn test_exact_beats_substring_overlap() {
        // "Buy now" is an exact key of element 0 and a substring of element
        // 1's key; tier 1 must win before any containment scan runs.
        let (index, elements) = page(&["Buy now", "Buy now before they're gone forever"]);

        let m = locate(&pattern("Buy now"), &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_eq!(m.tier, MatchTier::ExactText);
    }

    #[test]
    fn test_tier2_selector_hint() {
        let elements = vec![
            VisibleElement::new("p", "plain paragraph", "body > p:nth-child(1)"),
            VisibleElement::new("button", "Continue", "body > button:nth-child(2)").with_id("continue-btn"),
        ];
        let index = TextIndex::build(&elements);

        let p = pattern("text that appears nowhere whatsoever").with_selector("#continue-btn");
        let m = locate(&p, &index, &elements).unwrap();
        assert_eq!(m.element, 1);
        assert_eq!(m.tier, MatchTier::Selector);
    }

    #[test]
    fn test_invalid_selector_falls_through() {
        let (index, elements) = page(&["Hurry, offer expires at midnight tonight"]);

        // Unsupported selector syntax must not abort the cascade
        let p = pattern("offer expires at midnight").with_selector("div > p:nth-of-type(2)[data-x]");
        let m = locate(&p, &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_ne!(m.tier, MatchTier::Selector);
    }

    #[test]
    fn test_tier3_phrase_after_trim_mismatch() {
        // Scenario from the paragraph: the on-page text carries a second
        // sentence, so the quoted text misses tier 1 and resolves through a
        // phrase window instead.
        let (index, elements) = page(&["Only 2 items left in stock! Buy now before they're gone."]);

        let m = locate(&pattern("Only 2 items left in stock!"), &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_eq!(m.tier, MatchTier::Phrase);
    }

    #[test]
    fn test_tier3_prefers_longer_windows() {
        // Element 0 only contains the 2-token phrase "deal ends", element 1
        // contains the full 4-token quote; the longer window is tried first.
        let (index, elements) = page(&[
            "This deal ends someday",
            "Mega deal ends tomorrow night, act fast",
        ]);

        let m = locate(&pattern("deal ends tomorrow night"), &index, &elements).unwrap();
        assert_eq!(m.element, 1);
        assert_eq!(m.tier, MatchTier::Phrase);
    }

    #[test]
    fn test_tier4_significant_word() {
        let (index, elements) = page(&["Your subscription renews automatically"]);

        // No 2+ token phrase of the quote appears on the page, but the
        // significant token "subscription" does.
        let m = locate(&pattern("cancel subscription penalty"), &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_eq!(m.tier, MatchTier::SignificantWord);
    }

    #[test]
    fn test_tier5_description_keyword() {
        let (index, elements) = page(&["Free shipping on your purchase today"]);

        // Quote shares nothing with the page; the description token
        // "purchase" (8 chars) lands via the document scan.
        let p = pattern("zzz qqq");
        let m = locate(&p, &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_eq!(m.tier, MatchTier::DescriptionKeyword);
    }

    #[test]
    fn test_tier6_fuzzy_score_above_threshold() {
        let (index, elements) = page(&["great deals and offer stuff today"]);

        // Shared tokens: "deals" (5) + "offer" (5) + "today" (5) = 15 > 10
        let p = PatternDescriptor::new("offer deals today", "Urgency", "short words only");
        let m = locate(&p, &index, &elements).unwrap();
        assert_eq!(m.element, 0);
        assert_eq!(m.tier, MatchTier::FuzzyOverlap);
    }

    #[test]
    fn test_fuzzy_score_of_exactly_ten_is_rejected() {
        let (index, elements) = page(&["deals and offer stuff"]);

        // Shared tokens: "deals" (5) + "offer" (5) = 10, not strictly greater
        let p = PatternDescriptor::new("offer deals", "Urgency", "short words only");
        assert_eq!(locate(&p, &index, &elements), None);
    }

    #[test]
    fn test_no_match_after_all_tiers() {
        let (index, elements) = page(&["An ordinary page about gardening"]);

        let p = PatternDescriptor::new("zzz qqq", "Sneaking", "vvv www");
        assert_eq!(locate(&p, &index, &elements), None);
    }

    #[test]
    fn test_empty_pattern_text_skips_text_tiers() {
        let (index, elements) = page(&["Checkout requires membership enrollment"]);

        let p = PatternDescriptor::new("", "Forced Continuity", "automatic enrollment trap");
        let m = locate(&p, &index, &elements).unwrap();
        assert_eq!(m.tier, MatchTier::DescriptionKeyword);
    }

    #[test]
    fn test_single_token_pattern_skips_phrase_tier() {
        let (index, elements) = page(&["Exclusive membership benefits await"]);

        let m = locate(&pattern("membership"), &index, &elements).unwrap();
        assert_eq!(m.tier, MatchTier::SignificantWord);
    }
}
