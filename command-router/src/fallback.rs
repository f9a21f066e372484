//! Keyword fallback: business FAQ rules first, then fixed heuristics for
//! greetings, help, and thanks. Deterministic, no NLU.

use business_modules::texts;
use kasibot_core::{Business, Customer, FaqStore, StoreError};
use std::sync::Arc;
use tracing::debug;

const GREETING_KEYWORDS: &[&str] = &[
    "hi", "hello", "hey", "howzit", "hallo", "molo", "molweni", "sawubona", "dumela", "lumela",
    "good morning", "good afternoon", "good evening",
];

const HELP_KEYWORDS: &[&str] = &["help", "hulp", "uncedo", "usizo", "thuso"];

const THANKS_KEYWORDS: &[&str] = &[
    "thank", "thanks", "dankie", "enkosi", "ngiyabonga", "ke a leboha", "sharp",
];

/// Guesses the customer's language from characteristic keywords. Returns
/// `None` when nothing distinctive is found.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let checks: &[(&'static str, &[&str])] = &[
        ("af", &["hallo", "dankie", "asseblief", "goeie"]),
        ("xh", &["molo", "molweni", "enkosi", "uncedo"]),
        ("zu", &["sawubona", "ngiyabonga", "usizo", "yebo"]),
        ("st", &["dumela", "lumela", "ke a leboha", "thuso"]),
    ];
    for (lang, keywords) in checks {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(lang);
        }
    }
    None
}

fn contains_word(lower: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        return lower.contains(keyword);
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == keyword)
}

/// Evaluates FAQ rules and canned-text heuristics for messages nothing else
/// claimed.
pub struct FallbackMatcher {
    faq: Arc<dyn FaqStore>,
}

impl FallbackMatcher {
    pub fn new(faq: Arc<dyn FaqStore>) -> Self {
        Self { faq }
    }

    /// The fallback answer, or `None` when the message matches nothing.
    ///
    /// Rules are evaluated priority descending, the customer's exact language
    /// before generic rules on ties. Rule evaluation is skipped entirely when
    /// the business has the FAQ fallback disabled; the fixed heuristics
    /// always run.
    pub async fn answer(
        &self,
        business: &Business,
        customer: &Customer,
        text: &str,
    ) -> Result<Option<String>, StoreError> {
        let normalized = text.trim().to_lowercase();
        let language = customer.effective_language(&business.language);

        if business.ai_enabled {
            let mut rules = self.faq.list_rules(business.id, language).await?;
            rules.sort_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then_with(|| (b.language == language).cmp(&(a.language == language)))
            });
            if let Some(rule) = rules.iter().find(|r| r.matches(&normalized)) {
                debug!(rule_id = rule.id, business_id = business.id, "faq rule matched");
                return Ok(Some(rule.answer.clone()));
            }
        }

        if GREETING_KEYWORDS.iter().any(|k| contains_word(&normalized, k)) {
            let greeting_lang = detect_language(&normalized).unwrap_or(language);
            return Ok(Some(texts::greeting(greeting_lang, &business.name)));
        }
        if HELP_KEYWORDS.iter().any(|k| contains_word(&normalized, k)) {
            return Ok(Some(
                texts::help_text(language, business.business_type).to_string(),
            ));
        }
        if THANKS_KEYWORDS.iter().any(|k| contains_word(&normalized, k)) {
            return Ok(Some(texts::thanks(language).to_string()));
        }

        Ok(None)
    }
}
