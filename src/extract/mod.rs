//! Line-oriented event extractors.
//!
//! Both extractors share one discipline: an ordered list of
//! `(pattern, event)` rules is tested against each line, and the first rule
//! whose pattern occurs anywhere in the line claims it. Later rules are not
//! consulted for that line. Lines that match nothing are counted as
//! unmatched and otherwise ignored.

pub mod mobility;
pub mod session;

pub use mobility::{extract_mobility, MobilityExtraction};
pub use session::{extract_session, SessionExtraction};

use regex::Regex;

/// Ordered first-match-wins rule table.
pub struct RuleSet<E> {
    rules: Vec<(Regex, E)>,
}

impl<E: Copy> RuleSet<E> {
    /// Build from `(pattern, event)` pairs; order is the tie-break order.
    ///
    /// Patterns are compile-time constants, so an invalid one is a bug.
    pub fn new(rules: &[(&str, E)]) -> Self {
        let rules = rules
            .iter()
            .map(|(pattern, event)| {
                let re = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid extractor pattern '{}': {}", pattern, e));
                (re, *event)
            })
            .collect();
        Self { rules }
    }

    pub fn first_match(&self, line: &str) -> Option<E> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(line))
            .map(|(_, event)| *event)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_listed_rule_wins() {
        let rules = RuleSet::new(&[("alpha", 1u8), ("beta", 2u8)]);
        assert_eq!(rules.first_match("beta then alpha"), Some(1));
        assert_eq!(rules.first_match("only beta"), Some(2));
        assert_eq!(rules.first_match("gamma"), None);
    }

    #[test]
    fn test_match_is_unanchored() {
        let rules = RuleSet::new(&[("registration_request", ())]);
        assert!(rules.first_match(r#"{"event_name": "registration_request"}"#).is_some());
    }
}
