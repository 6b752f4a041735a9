//! Координатор бронирования.
//!
//! Каждое бронирование — одна транзакция: удерживаем все свободные места,
//! прогоняем селектор по удержанному снимку, помечаем выбранные места одним
//! условным UPDATE и коммитим. При любом отказе или сбое транзакция
//! откатывается, частичных броней не бывает.
//!
//! Повторов при конфликтах нет: под READ COMMITTED с `FOR UPDATE` ошибок
//! сериализации не возникает, а таймаут блокировки отдаётся вызывающему
//! как сбой хранилища.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    error::{BookingError, StoreError},
    models::Seat,
    services::selector::{select_seats, Strategy},
    store::{ResetReport, SeatStore, SeatTransaction},
};

/// Допустимое количество мест в одной брони: от 1 до `max_seats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    pub max_seats: u32,
}

impl BookingPolicy {
    pub const MIN_SEATS: u32 = 1;

    pub fn new(max_seats: u32) -> Self {
        Self { max_seats }
    }

    pub fn validate(&self, requested: i64) -> Result<usize, BookingError> {
        if requested < i64::from(Self::MIN_SEATS) || requested > i64::from(self.max_seats) {
            return Err(BookingError::InvalidCount {
                requested,
                min: Self::MIN_SEATS,
                max: self.max_seats,
            });
        }
        Ok(requested as usize)
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self { max_seats: 7 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Забронированные места по возрастанию id
    pub seats: Vec<Seat>,
    pub strategy: Strategy,
}

#[derive(Clone)]
pub struct SeatAllocator {
    store: Arc<dyn SeatStore>,
    policy: BookingPolicy,
}

impl SeatAllocator {
    pub fn new(store: Arc<dyn SeatStore>, policy: BookingPolicy) -> Self {
        Self { store, policy }
    }

    /// Бронирует `requested` мест целиком или не бронирует ничего.
    pub async fn book(&self, requested: i64) -> Result<Booking, BookingError> {
        // Невалидный запрос отклоняем до открытия транзакции
        let count = self.policy.validate(requested)?;

        let mut tx = self.store.begin().await?;

        match Self::book_in(&mut tx, count).await {
            Ok(booking) => {
                tx.commit().await?;
                info!(
                    "Booked {} seats via {:?}: {:?}",
                    count,
                    booking.strategy,
                    booking.seats.iter().map(|s| s.id).collect::<Vec<_>>()
                );
                Ok(booking)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Failed to roll back booking transaction: {}", rollback_err);
                }
                match &err {
                    BookingError::InsufficientSeats {
                        requested,
                        available,
                    } => info!(
                        "Rejected booking of {} seats, {} free",
                        requested, available
                    ),
                    other => error!("Booking of {} seats failed: {}", count, other),
                }
                Err(err)
            }
        }
    }

    async fn book_in(
        tx: &mut Box<dyn SeatTransaction>,
        count: usize,
    ) -> Result<Booking, BookingError> {
        let free = tx.lock_free_seats().await?;

        let selection =
            select_seats(&free, count).ok_or(BookingError::InsufficientSeats {
                requested: count,
                available: free.len(),
            })?;

        let mut seats = tx.mark_booked(&selection.seat_ids(), None).await?;
        if seats.len() != count {
            return Err(StoreError::UnexpectedRowCount {
                expected: count,
                actual: seats.len(),
            }
            .into());
        }
        seats.sort_unstable_by_key(|s| s.id);

        Ok(Booking {
            seats,
            strategy: selection.strategy,
        })
    }

    pub async fn list_seats(&self) -> Result<Vec<Seat>, BookingError> {
        Ok(self.store.list_seats().await?)
    }

    /// Освобождает все места. Повторный вызов даёт то же состояние.
    pub async fn reset_all(&self) -> Result<ResetReport, BookingError> {
        warn!("RESET: releasing all seats");
        let report = self.store.reset_all().await?;
        warn!(
            "RESET: {} of {} seats released",
            report.released, report.total
        );
        Ok(report)
    }
}
