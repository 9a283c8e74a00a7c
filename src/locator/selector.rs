//! Simple-selector evaluation for the tier-2 selector hint.
//!
//! The classifier rarely populates the selector field, and when it does the
//! string is untrusted output. Only compound simple selectors are supported
//! (`tag`, `#id`, `.class` and combinations like `button.cta#buy`); anything
//! with combinators, attributes or pseudo-classes is reported as unsupported
//! and the caller treats it as a miss, never as a fatal error.

use crate::page::VisibleElement;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Unsupported selector: {0}")]
pub struct UnsupportedSelector(pub String);

/// A parsed compound simple selector
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl SimpleSelector {
    /// Parse a selector string, rejecting anything beyond compound simple selectors
    pub fn parse(input: &str) -> Result<Self, UnsupportedSelector> {
        let input = input.trim();
        if input.is_empty() {
            return Err(UnsupportedSelector(input.to_string()));
        }

        let mut tag = None;
        let mut id = None;
        let mut classes = Vec::new();

        let mut chars = input.chars().peekable();
        let mut leading = true;

        while let Some(&c) = chars.peek() {
            let (kind, name) = match c {
                '#' | '.' => {
                    chars.next();
                    (c, take_identifier(&mut chars))
                }
                _ if leading => ('\0', take_identifier(&mut chars)),
                _ => return Err(UnsupportedSelector(input.to_string())),
            };
            leading = false;

            if name.is_empty() {
                return Err(UnsupportedSelector(input.to_string()));
            }

            match kind {
                '#' => {
                    if id.replace(name).is_some() {
                        return Err(UnsupportedSelector(input.to_string()));
                    }
                }
                '.' => classes.push(name),
                _ => tag = Some(name.to_ascii_lowercase()),
            }
        }

        Ok(Self { tag, id, classes })
    }

    /// Check whether an element satisfies this selector
    pub fn matches(&self, element: &VisibleElement) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        self.classes.iter().all(|c| element.classes.iter().any(|ec| ec == c))
    }
}

/// Consume identifier characters (CSS ident subset: alphanumerics, '-', '_')
fn take_identifier(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

/// Resolve a selector hint against the recorded visible elements.
/// Unparsable selectors are logged and downgraded to a miss.
pub fn query(selector: &str, elements: &[VisibleElement]) -> Option<usize> {
    match SimpleSelector::parse(selector) {
        Ok(parsed) => elements.iter().position(|el| parsed.matches(el)),
        Err(e) => {
            log::debug!("Selector hint rejected: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements() -> Vec<VisibleElement> {
        vec![
            VisibleElement::new("p", "intro", "body > p:nth-child(1)"),
            VisibleElement::new("button", "Buy now", "body > button:nth-child(2)")
                .with_id("buy")
                .with_classes(vec!["cta".to_string(), "primary".to_string()]),
            VisibleElement::new("div", "footer", "body > div:nth-child(3)").with_classes(vec!["cta".to_string()]),
        ]
    }

    #[test]
    fn test_parse_tag() {
        let sel = SimpleSelector::parse("button").unwrap();
        assert!(sel.matches(&elements()[1]));
        assert!(!sel.matches(&elements()[0]));
    }

    #[test]
    fn test_parse_id_and_class() {
        assert_eq!(query("#buy", &elements()), Some(1));
        assert_eq!(query(".cta", &elements()), Some(1)); // first match in document order
        assert_eq!(query("div.cta", &elements()), Some(2));
        assert_eq!(query("button.cta.primary#buy", &elements()), Some(1));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(query("#missing", &elements()), None);
        assert_eq!(query("span", &elements()), None);
        assert_eq!(query("button.missing-class", &elements()), None);
    }

    #[test]
    fn test_unsupported_selectors_are_misses() {
        // Combinators, attribute selectors and pseudo-classes are unsupported
        assert_eq!(query("div > p", &elements()), None);
        assert_eq!(query("a[href]", &elements()), None);
        assert_eq!(query("p:first-child", &elements()), None);
        assert_eq!(query("", &elements()), None);
        assert_eq!(query("#", &elements()), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        assert!(SimpleSelector::parse("#a#b").is_err());
    }
}
