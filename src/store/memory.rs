use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{ResetReport, SeatStore, SeatTransaction};
use crate::{
    error::StoreError,
    models::{FreeSeat, Seat, SeatId, SeatLayout},
};

/// In-memory хранилище мест.
///
/// Транзакция владеет мьютексом таблицы всё время своей жизни, так что
/// удержание покрывает всю таблицу целиком. Изменения копятся в рабочей копии
/// и попадают в таблицу только при `commit`.
#[derive(Clone)]
pub struct MemorySeatStore {
    seats: Arc<Mutex<Vec<Seat>>>,
    lock_timeout: Duration,
}

impl MemorySeatStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            seats: Arc::new(Mutex::new(Vec::new())),
            lock_timeout,
        }
    }

    pub fn with_layout(layout: &SeatLayout, lock_timeout: Duration) -> Self {
        Self {
            seats: Arc::new(Mutex::new(layout.seats())),
            lock_timeout,
        }
    }

    async fn acquire(&self) -> Result<OwnedMutexGuard<Vec<Seat>>, StoreError> {
        tokio::time::timeout(self.lock_timeout, self.seats.clone().lock_owned())
            .await
            .map_err(|_| StoreError::LockTimeout)
    }
}

struct MemorySeatTransaction {
    table: OwnedMutexGuard<Vec<Seat>>,
    working: Vec<Seat>,
}

#[async_trait]
impl SeatTransaction for MemorySeatTransaction {
    async fn lock_free_seats(&mut self) -> Result<Vec<FreeSeat>, StoreError> {
        Ok(self
            .working
            .iter()
            .filter(|s| !s.is_booked)
            .map(FreeSeat::from)
            .collect())
    }

    async fn mark_booked(
        &mut self,
        ids: &[SeatId],
        holder: Option<Uuid>,
    ) -> Result<Vec<Seat>, StoreError> {
        let mut updated = Vec::with_capacity(ids.len());
        for seat in self.working.iter_mut() {
            if !seat.is_booked && ids.contains(&seat.id) {
                seat.is_booked = true;
                seat.held_by = holder;
                updated.push(seat.clone());
            }
        }
        Ok(updated)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemorySeatTransaction { mut table, working } = *self;
        *table = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn begin(&self) -> Result<Box<dyn SeatTransaction>, StoreError> {
        let table = self.acquire().await?;
        let working = table.clone();
        Ok(Box::new(MemorySeatTransaction { table, working }))
    }

    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError> {
        // Чтение тоже ждёт мьютекс, поэтому ограничено тем же таймаутом
        Ok(self.acquire().await?.clone())
    }

    async fn reset_all(&self) -> Result<ResetReport, StoreError> {
        let mut table = self.acquire().await?;
        let mut released = 0;
        for seat in table.iter_mut() {
            if seat.is_booked {
                released += 1;
            }
            seat.is_booked = false;
            seat.held_by = None;
        }
        Ok(ResetReport {
            released,
            total: table.len() as u64,
        })
    }

    async fn provision(&self, layout: &SeatLayout) -> Result<u64, StoreError> {
        let mut table = self.acquire().await?;
        if !table.is_empty() {
            return Ok(0);
        }
        *table = layout.seats();
        Ok(table.len() as u64)
    }
}
