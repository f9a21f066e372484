//! Shared row conversion helpers: error mapping and the TEXT date/time
//! formats used across tables.

use chrono::{NaiveDate, NaiveTime};
use kasibot_core::StoreError;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M";

pub(crate) fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| StoreError::Database(format!("bad date {s:?}: {e}")))
}

pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, StoreError> {
    NaiveTime::parse_from_str(s, TIME_FMT)
        .map_err(|e| StoreError::Database(format!("bad time {s:?}: {e}")))
}
