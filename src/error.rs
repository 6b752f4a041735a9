use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

// SQLSTATE lock_not_available: истёк lock_timeout при ожидании блокировки строки
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Сбои хранилища мест. Для вызывающего все они непрозрачны.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("timed out waiting for seat locks")]
    LockTimeout,
    #[error("seat store unavailable: {0}")]
    Unavailable(String),
    #[error("expected {expected} seats to change, {actual} changed")]
    UnexpectedRowCount { expected: usize, actual: usize },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE) =>
            {
                StoreError::LockTimeout
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Итог неудачного бронирования.
///
/// `InvalidCount` и `InsufficientSeats` — обычные отказы, о которых сообщаем клиенту
/// как есть. `Store` — внутренний сбой, транзакция к этому моменту уже откатена.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Number of seats must be between {min} and {max}.")]
    InvalidCount { requested: i64, min: u32, max: u32 },
    #[error("Not enough available seats to fulfill the request.")]
    InsufficientSeats { requested: usize, available: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match self {
            BookingError::InvalidCount { .. } | BookingError::InsufficientSeats { .. } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": self.to_string() }))).into_response()
            }
            BookingError::Store(err) => {
                tracing::error!("seat store failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}
