use crate::page::snapshot::VisibleElement;
use indexmap::IndexMap;

/// Number of tokens in a derived phrase key
pub const PHRASE_WINDOW: usize = 3;

/// A phrase is only indexed when longer than this many characters
pub const PHRASE_KEY_MIN_CHARS: usize = 10;

/// Mapping from text fragments to the element that owns them.
///
/// Keys are the full trimmed text of every visible element, plus each
/// contiguous 3-token phrase of texts longer than 3 tokens (when the phrase
/// exceeds 10 characters). Phrase keys buy match recall on long paragraphs
/// where the classifier quoted only a sub-phrase.
///
/// The map keeps a single element per key: when two elements produce the same
/// fragment, the later one in document order wins. Documented limitation, not
/// an invariant callers may rely on.
///
/// Insertion order is preserved so "first containment hit" scans in the
/// locator are deterministic and follow document order.
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    keys: IndexMap<String, usize>,
}

impl TextIndex {
    /// Build the index from a snapshot's element list
    pub fn build(elements: &[VisibleElement]) -> Self {
        let mut keys = IndexMap::new();

        for (element, info) in elements.iter().enumerate() {
            keys.insert(info.text.clone(), element);

            let tokens: Vec<&str> = info.text.split_whitespace().collect();
            if tokens.len() > PHRASE_WINDOW {
                for window in tokens.windows(PHRASE_WINDOW) {
                    let phrase = window.join(" ");
                    if phrase.len() > PHRASE_KEY_MIN_CHARS {
                        keys.insert(phrase, element);
                    }
                }
            }
        }

        Self { keys }
    }

    /// Exact key lookup
    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    /// Iterate over (key, element) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.keys.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
