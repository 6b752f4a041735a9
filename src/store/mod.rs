//! Хранилище мест.
//!
//! Таблица мест — единственный общий изменяемый ресурс. Доступ к ней идёт
//! только через [`SeatStore`] и его транзакции, поэтому селектор остаётся
//! чистым, а бронирование можно проверять на in-memory реализации.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::{Config, StoreKind},
    database::Database,
    error::StoreError,
    models::{FreeSeat, Seat, SeatId, SeatLayout},
};

pub use memory::MemorySeatStore;
pub use postgres::PgSeatStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    /// Сколько мест было занято до сброса
    pub released: u64,
    /// Сколько мест затронул сброс (все места таблицы)
    pub total: u64,
}

#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Открывает транзакцию бронирования.
    async fn begin(&self) -> Result<Box<dyn SeatTransaction>, StoreError>;

    /// Снимок всех мест по возрастанию id, без блокировок.
    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError>;

    /// Безусловно освобождает все места одной атомарной операцией.
    async fn reset_all(&self) -> Result<ResetReport, StoreError>;

    /// Создаёт места раскладки, если таблица пуста. Возвращает число
    /// созданных мест; существующую таблицу не трогает.
    async fn provision(&self, layout: &SeatLayout) -> Result<u64, StoreError>;
}

/// Транзакция бронирования. Удержания живут до `commit`/`rollback`;
/// транзакция, брошенная без `commit`, откатывается.
#[async_trait]
pub trait SeatTransaction: Send {
    /// Все свободные места с эксклюзивным удержанием каждой строки.
    /// Удержания берутся одним запросом в порядке возрастания id.
    async fn lock_free_seats(&mut self) -> Result<Vec<FreeSeat>, StoreError>;

    /// Помечает места занятыми, но только те, что ещё свободны.
    /// Возвращает фактически изменённые строки.
    async fn mark_booked(
        &mut self,
        ids: &[SeatId],
        holder: Option<Uuid>,
    ) -> Result<Vec<Seat>, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Собирает хранилище согласно конфигурации и заводит в нём места раскладки.
pub async fn build_store(config: &Config) -> Result<Arc<dyn SeatStore>, StoreError> {
    let store: Arc<dyn SeatStore> = match config.booking.store {
        StoreKind::Postgres => {
            let db = Database::new(&config.database).await?;
            db.run_migrations().await?;
            Arc::new(PgSeatStore::new(db.pool, config.booking.lock_timeout))
        }
        StoreKind::Memory => Arc::new(MemorySeatStore::new(config.booking.lock_timeout)),
    };

    let created = store.provision(&config.booking.layout).await?;
    if created > 0 {
        tracing::info!("Provisioned {} seats", created);
    }

    Ok(store)
}
