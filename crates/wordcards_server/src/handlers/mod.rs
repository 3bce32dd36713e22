//! Route handlers. Each one extracts input, runs a core service on a pooled
//! connection, and serializes the result.

pub mod auth;
pub mod cards;
pub mod word_lists;

use crate::error::MessageBody;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Liveness plus a storage round-trip.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let checked = state
        .with_conn(|conn| {
            conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))
                .map_err(|err| wordcards_core::CoreError::Internal(err.to_string()))
        })
        .await;
    match checked {
        Ok(_) => HttpResponse::Ok().json(HealthBody {
            status: "Backend is running",
        }),
        Err(err) => {
            log::error!("event=health_check module=server status=error error={err}");
            HttpResponse::ServiceUnavailable().json(MessageBody::new("Database unavailable"))
        }
    }
}
