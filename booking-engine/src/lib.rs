//! # booking-engine
//!
//! Slot grid generation and atomic check-and-reserve over the booking store.
//! The grid spans the business-configured open/close window for the weekday
//! (standard 09:00–17:00 when the business has no hours configured) at a
//! fixed interval; availability filters out slots held by non-cancelled
//! bookings. Reservation delegates to the store's atomic `reserve_slot`, so
//! two concurrent callers can never both claim the same slot.

use chrono::{Datelike, NaiveDate, NaiveTime};
use kasibot_core::{
    Booking, BookingFilters, BookingStore, Business, ReserveError, SlotRequest, StoreError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Slot length in minutes.
pub const DEFAULT_INTERVAL_MIN: u32 = 30;

const STANDARD_OPEN_MIN: u32 = 9 * 60;
const STANDARD_CLOSE_MIN: u32 = 17 * 60;

/// An open/close window with a slot interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub interval_min: u32,
}

impl SlotWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            open,
            close,
            interval_min: DEFAULT_INTERVAL_MIN,
        }
    }

    /// The standard 09:00–17:00 window at the default interval.
    pub fn standard() -> Self {
        Self {
            open: minutes_to_time(STANDARD_OPEN_MIN),
            close: minutes_to_time(STANDARD_CLOSE_MIN),
            interval_min: DEFAULT_INTERVAL_MIN,
        }
    }

    /// Every slot start time in `[open, close)`.
    pub fn slot_grid(&self) -> Vec<NaiveTime> {
        let mut slots = Vec::new();
        if self.interval_min == 0 {
            return slots;
        }
        let open = time_to_minutes(self.open);
        let close = time_to_minutes(self.close);
        let mut t = open;
        while t < close {
            slots.push(minutes_to_time(t));
            t += self.interval_min;
        }
        slots
    }
}

fn time_to_minutes(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.hour() * 60 + t.minute()
}

fn minutes_to_time(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Why a reservation did not produce a booking.
#[derive(Error, Debug)]
pub enum ReserveFailure {
    /// The requested slot is taken or not on the grid for that day; `free`
    /// is the current set of available slots to suggest as alternatives.
    #[error("Slot not available")]
    Conflict { free: Vec<NaiveTime> },

    /// The business is closed on that day.
    #[error("Closed on the requested day")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Computes and reserves appointment slots against the booking store.
#[derive(Clone)]
pub struct AvailabilityEngine {
    bookings: Arc<dyn BookingStore>,
}

impl AvailabilityEngine {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }

    /// Window for the business on the given date: the configured hours for
    /// that weekday, the standard window when the business has no hours
    /// configured at all, and `None` (closed) when the day is marked closed
    /// or its entry cannot be parsed.
    pub fn window_for(business: &Business, date: NaiveDate) -> Option<SlotWindow> {
        if business.operating_hours.is_empty() {
            return Some(SlotWindow::standard());
        }
        business
            .operating_hours
            .window_for(date.weekday())
            .map(|(open, close)| SlotWindow::new(open, close))
    }

    /// Free slots for the business and date: the full grid minus every slot
    /// held by a non-cancelled booking. Empty on a closed day.
    pub async fn available_slots(
        &self,
        business: &Business,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, StoreError> {
        let Some(window) = Self::window_for(business, date) else {
            return Ok(Vec::new());
        };
        let occupied = self.occupied_slots(business.id, date).await?;
        let free: Vec<NaiveTime> = window
            .slot_grid()
            .into_iter()
            .filter(|slot| !occupied.contains(slot))
            .collect();
        debug!(
            business_id = business.id,
            date = %date,
            free = free.len(),
            "computed availability"
        );
        Ok(free)
    }

    /// Reserves one exact slot. Succeeds only if the slot was free at the
    /// moment of creation; a concurrent claim surfaces as
    /// [`ReserveFailure::Conflict`] with the remaining free slots.
    pub async fn reserve(
        &self,
        business: &Business,
        request: SlotRequest,
    ) -> Result<Booking, ReserveFailure> {
        let Some(window) = Self::window_for(business, request.date) else {
            return Err(ReserveFailure::Closed);
        };
        if !window.slot_grid().contains(&request.time) {
            let free = self.available_slots(business, request.date).await?;
            return Err(ReserveFailure::Conflict { free });
        }

        match self.bookings.reserve_slot(&request).await {
            Ok(booking) => {
                info!(
                    business_id = business.id,
                    booking_id = booking.id,
                    date = %booking.date,
                    time = %booking.time,
                    "slot reserved"
                );
                Ok(booking)
            }
            Err(ReserveError::SlotTaken) => {
                let free = self.available_slots(business, request.date).await?;
                Err(ReserveFailure::Conflict { free })
            }
            Err(ReserveError::Store(e)) => Err(ReserveFailure::Store(e)),
        }
    }

    async fn occupied_slots(
        &self,
        business_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, StoreError> {
        let filters = BookingFilters {
            business_id: Some(business_id),
            date: Some(date),
            active_only: true,
            ..Default::default()
        };
        let bookings = self.bookings.list_bookings(&filters).await?;
        Ok(bookings.into_iter().map(|b| b.time).collect())
    }
}
