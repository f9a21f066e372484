//! Per-customer dialogue session: the only in-process mutable state the
//! core owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the module owning an active interactive flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKey {
    Barber,
    Carwash,
}

impl ModuleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::Barber => "barber",
            ModuleKey::Carwash => "carwash",
        }
    }
}

/// Accumulated answer fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData(Vec<(String, String)>);

impl SessionData {
    /// Stores a field, replacing an earlier value for the same key in place.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_string();
        } else {
            self.0.push((key.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Active-flow record for one customer.
///
/// Invariant: `module == None` implies `step == None` and `data` empty.
/// Mutated only by the module currently owning it (via the router, under the
/// per-customer lock); cleared on flow completion or any global command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub module: Option<ModuleKey>,
    pub step: Option<String>,
    pub data: SessionData,
    pub business_id: i64,
    pub last_touch: DateTime<Utc>,
}

impl Session {
    pub fn new(business_id: i64) -> Self {
        Self {
            module: None,
            step: None,
            data: SessionData::default(),
            business_id,
            last_touch: Utc::now(),
        }
    }

    /// True when a module owns this session.
    pub fn in_flow(&self) -> bool {
        self.module.is_some()
    }

    /// Begins a flow for the given module, discarding any previous state.
    pub fn start_flow(&mut self, key: ModuleKey, business_id: i64) {
        self.module = Some(key);
        self.step = None;
        self.data.clear();
        self.business_id = business_id;
    }

    /// Returns the session to the no-flow state, restoring the invariant.
    pub fn clear(&mut self) {
        self.module = None;
        self.step = None;
        self.data.clear();
    }

    pub fn touch(&mut self) {
        self.last_touch = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_restores_invariant() {
        let mut s = Session::new(7);
        s.start_flow(ModuleKey::Barber, 7);
        s.step = Some("collect_date".to_string());
        s.data.insert("date", "2026-09-01");

        s.clear();
        assert!(s.module.is_none());
        assert!(s.step.is_none());
        assert!(s.data.is_empty());
    }

    #[test]
    fn data_preserves_insertion_order_and_replaces() {
        let mut d = SessionData::default();
        d.insert("date", "2026-09-01");
        d.insert("time", "10:00");
        d.insert("date", "2026-09-02");

        let pairs: Vec<_> = d.iter().collect();
        assert_eq!(
            pairs,
            vec![("date", "2026-09-02"), ("time", "10:00")]
        );
    }
}
