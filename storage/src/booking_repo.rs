//! Booking store. `reserve_slot` relies on the partial unique index over
//! (business_id, booking_date, booking_time) for non-cancelled rows, so the
//! insert itself is the atomic check-and-reserve.

use crate::convert::{db_err, parse_date, parse_time, DATE_FMT, TIME_FMT};
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use kasibot_core::{
    Booking, BookingFilters, BookingStatus, BookingStore, ReserveError, SlotRequest, StoreError,
};
use sqlx::error::ErrorKind;
use tracing::info;

#[derive(Clone)]
pub struct BookingRepo {
    pool_manager: SqlitePoolManager,
}

impl BookingRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }
}

type BookingRow = (i64, i64, i64, i64, String, String, String);

fn from_row(row: BookingRow) -> Result<Booking, StoreError> {
    let (id, business_id, customer_id, service_id, date, time, status_tag) = row;
    let status = BookingStatus::parse(&status_tag)
        .ok_or_else(|| StoreError::Database(format!("unknown booking status {status_tag:?}")))?;
    Ok(Booking {
        id,
        business_id,
        customer_id,
        service_id,
        date: parse_date(&date)?,
        time: parse_time(&time)?,
        status,
    })
}

#[async_trait]
impl BookingStore for BookingRepo {
    async fn reserve_slot(&self, request: &SlotRequest) -> Result<Booking, ReserveError> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (business_id, customer_id, service_id, booking_date, booking_time, status)
            VALUES (?, ?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(request.business_id)
        .bind(request.customer_id)
        .bind(request.service_id)
        .bind(request.date.format(DATE_FMT).to_string())
        .bind(request.time.format(TIME_FMT).to_string())
        .execute(self.pool_manager.pool())
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                info!(
                    booking_id = id,
                    business_id = request.business_id,
                    date = %request.date,
                    time = %request.time,
                    "booking created"
                );
                Ok(Booking {
                    id,
                    business_id: request.business_id,
                    customer_id: request.customer_id,
                    service_id: request.service_id,
                    date: request.date,
                    time: request.time,
                    status: BookingStatus::Pending,
                })
            }
            Err(sqlx::Error::Database(e)) if e.kind() == ErrorKind::UniqueViolation => {
                Err(ReserveError::SlotTaken)
            }
            Err(e) => Err(ReserveError::Store(db_err(e))),
        }
    }

    async fn list_bookings(&self, filters: &BookingFilters) -> Result<Vec<Booking>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT id, business_id, customer_id, service_id, booking_date, booking_time, status
            FROM bookings WHERE 1=1
            "#,
        );
        if filters.business_id.is_some() {
            sql.push_str(" AND business_id = ?");
        }
        if filters.customer_id.is_some() {
            sql.push_str(" AND customer_id = ?");
        }
        if filters.date.is_some() {
            sql.push_str(" AND booking_date = ?");
        }
        if filters.active_only {
            sql.push_str(" AND status != 'cancelled'");
        }
        sql.push_str(" ORDER BY booking_date, booking_time");

        let mut query = sqlx::query_as::<_, BookingRow>(&sql);
        if let Some(id) = filters.business_id {
            query = query.bind(id);
        }
        if let Some(id) = filters.customer_id {
            query = query.bind(id);
        }
        if let Some(date) = filters.date {
            query = query.bind(date.format(DATE_FMT).to_string());
        }

        let rows = query
            .fetch_all(self.pool_manager.pool())
            .await
            .map_err(db_err)?;
        rows.into_iter().map(from_row).collect()
    }

    async fn update_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(booking_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("booking {booking_id}")));
        }
        Ok(())
    }
}
