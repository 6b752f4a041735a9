use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::{error::BookingError, models::Seat, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_seats))
        .route("/seats/book", post(book_seats))
        .route("/seats/reset", post(reset_seats))
}

/* ---------- SEATS ---------- */

// GET /api/seats
async fn get_seats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, BookingError> {
    let seats = state.allocator.list_seats().await?;
    Ok((StatusCode::OK, Json(seats)))
}

// POST /api/seats/book
#[derive(Debug, Deserialize)]
pub struct BookSeatsRequest {
    #[serde(rename = "numSeats")]
    pub num_seats: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BookSeatsResponse {
    pub msg: &'static str,
    #[serde(rename = "bookedSeats")]
    pub booked_seats: Vec<Seat>,
}

async fn book_seats(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookSeatsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BookingError> {
    // Нет поля или не число — тот же отказ валидации, что и для числа вне диапазона
    let requested = match payload {
        Ok(Json(req)) => req.num_seats.unwrap_or(0),
        Err(rejection) => {
            tracing::debug!("book_seats: unreadable body: {}", rejection);
            0
        }
    };

    let booking = state.allocator.book(requested).await?;

    Ok((
        StatusCode::OK,
        Json(BookSeatsResponse {
            msg: "Seats booked successfully!",
            booked_seats: booking.seats,
        }),
    ))
}

// POST /api/seats/reset
async fn reset_seats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, BookingError> {
    let report = state.allocator.reset_all().await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "msg": "All seats have been reset and are now available.",
            "details": {
                "seats_released": report.released,
                "total_seats": report.total
            }
        })),
    ))
}
