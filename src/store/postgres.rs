use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ResetReport, SeatStore, SeatTransaction};
use crate::{
    error::StoreError,
    models::{FreeSeat, Seat, SeatId, SeatLayout},
};

/// Хранилище мест поверх PostgreSQL.
///
/// Бронирование держит `SELECT ... FOR UPDATE` на всех свободных строках до
/// конца транзакции. Сброс сначала берёт `LOCK TABLE ... IN EXCLUSIVE MODE`:
/// этот режим конфликтует с ROW SHARE, который берёт `FOR UPDATE`, поэтому
/// сброс дожидается текущих броней и не пускает новые ещё до блокировок строк.
#[derive(Clone)]
pub struct PgSeatStore {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PgSeatStore {
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    async fn begin_with_timeout(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // SET LOCAL не принимает параметры, set_config(..., true) — то же самое
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

struct PgSeatTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SeatTransaction for PgSeatTransaction {
    async fn lock_free_seats(&mut self) -> Result<Vec<FreeSeat>, StoreError> {
        let seats = sqlx::query_as::<_, FreeSeat>(
            "SELECT id, row_number FROM seats WHERE is_booked = FALSE ORDER BY id FOR UPDATE",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        debug!("Locked {} free seats", seats.len());
        Ok(seats)
    }

    async fn mark_booked(
        &mut self,
        ids: &[SeatId],
        holder: Option<Uuid>,
    ) -> Result<Vec<Seat>, StoreError> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats
            SET is_booked = TRUE, held_by = $1
            WHERE id = ANY($2) AND is_booked = FALSE
            RETURNING id, row_number, is_booked, held_by
            "#,
        )
        .bind(holder)
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(seats)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl SeatStore for PgSeatStore {
    async fn begin(&self) -> Result<Box<dyn SeatTransaction>, StoreError> {
        let tx = self.begin_with_timeout().await?;
        Ok(Box::new(PgSeatTransaction { tx }))
    }

    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT id, row_number, is_booked, held_by FROM seats ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(seats)
    }

    async fn reset_all(&self) -> Result<ResetReport, StoreError> {
        let mut tx = self.begin_with_timeout().await?;

        sqlx::query("LOCK TABLE seats IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let released: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE is_booked = TRUE")
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("UPDATE seats SET is_booked = FALSE, held_by = NULL")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ResetReport {
            released: released as u64,
            total: result.rows_affected(),
        })
    }

    async fn provision(&self, layout: &SeatLayout) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Параллельный старт двух инстансов не должен заводить места дважды
        sqlx::query("LOCK TABLE seats IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats")
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            if existing as u64 != layout.total_seats() {
                warn!(
                    "Seat table already holds {} seats, configured layout has {}; keeping the table",
                    existing,
                    layout.total_seats()
                );
            }
            tx.rollback().await?;
            return Ok(0);
        }

        let seats = layout.seats();
        let ids: Vec<SeatId> = seats.iter().map(|s| s.id).collect();
        let rows: Vec<i32> = seats.iter().map(|s| s.row_number).collect();

        let result = sqlx::query(
            "INSERT INTO seats (id, row_number) SELECT * FROM UNNEST($1::bigint[], $2::int[])",
        )
        .bind(&ids)
        .bind(&rows)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
