//! Customer identity. Created on first contact, read-mostly thereafter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    /// Channel address the customer writes from (phone number).
    pub channel_address: String,
    pub name: String,
    /// Preferred language code (en, af, xh, zu, st).
    pub language: String,
    pub business_id: i64,
}

impl Customer {
    /// Effective reply language: the customer's preference, falling back to
    /// the business default.
    pub fn effective_language<'a>(&'a self, business_language: &'a str) -> &'a str {
        if self.language.is_empty() {
            business_language
        } else {
            &self.language
        }
    }
}
