//! Business tenant: identity, type, language, operating hours.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported business types. Each type maps to one business module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Barber,
    Carwash,
    Spaza,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Barber => "barber",
            BusinessType::Carwash => "carwash",
            BusinessType::Spaza => "spaza",
        }
    }

    /// Parses the stored type tag. Unknown tags yield `None` so callers can
    /// decide how to handle an unsupported business record.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "barber" => Some(BusinessType::Barber),
            "carwash" => Some(BusinessType::Carwash),
            "spaza" => Some(BusinessType::Spaza),
            _ => None,
        }
    }
}

/// Weekly operating hours, keyed by lowercase day name. Values are either
/// an `"HH:MM-HH:MM"` window or `"closed"`. Stored as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(pub BTreeMap<String, String>);

impl OperatingHours {
    /// Open/close window for the given weekday.
    ///
    /// Returns `None` when the day is marked closed. A missing or
    /// unparseable entry also returns `None`; the booking engine falls back
    /// to its standard window in that case only when the whole table is
    /// empty (unconfigured business).
    pub fn window_for(&self, day: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        let entry = self.0.get(day_key(day))?;
        parse_window(entry)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entry_for(&self, day: Weekday) -> Option<&str> {
        self.0.get(day_key(day)).map(|s| s.as_str())
    }
}

fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn parse_window(entry: &str) -> Option<(NaiveTime, NaiveTime)> {
    let entry = entry.trim();
    if entry.eq_ignore_ascii_case("closed") {
        return None;
    }
    let (open, close) = entry.split_once('-')?;
    let open = NaiveTime::parse_from_str(open.trim(), "%H:%M").ok()?;
    let close = NaiveTime::parse_from_str(close.trim(), "%H:%M").ok()?;
    if open < close {
        Some((open, close))
    } else {
        None
    }
}

/// A tenant of the system. Immutable during a single message-handling
/// operation; owned by the business directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    /// Inbound channel address (the WhatsApp number customers write to).
    pub channel_address: String,
    pub business_type: BusinessType,
    pub language: String,
    pub operating_hours: OperatingHours,
    /// Whether the FAQ-rule fallback is evaluated for this business.
    pub ai_enabled: bool,
}
