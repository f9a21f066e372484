//! FAQ rule: keyword pattern → canned answer, with language and priority.

use serde::{Deserialize, Serialize};

/// One fallback rule. `pattern` is a single literal substring or several
/// pipe-separated alternatives, matched against the normalized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRule {
    pub id: i64,
    pub business_id: i64,
    pub pattern: String,
    pub answer: String,
    pub language: String,
    pub priority: i64,
}

impl FaqRule {
    /// True when any alternative of the pattern is contained in the
    /// normalized (lowercased, trimmed) message text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.pattern
            .split('|')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .any(|k| normalized.contains(&k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> FaqRule {
        FaqRule {
            id: 1,
            business_id: 1,
            pattern: pattern.to_string(),
            answer: "answer".to_string(),
            language: "en".to_string(),
            priority: 0,
        }
    }

    #[test]
    fn matches_single_substring() {
        assert!(rule("price").matches("what is the price of bread"));
        assert!(!rule("price").matches("hello there"));
    }

    #[test]
    fn matches_pipe_alternatives() {
        let r = rule("airtime | data|electricity");
        assert!(r.matches("do you sell data bundles"));
        assert!(r.matches("electricity vouchers?"));
        assert!(!r.matches("bread please"));
    }
}
