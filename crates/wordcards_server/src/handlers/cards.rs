//! `/api/cards` handlers. Ownership is derived through the owning list; a
//! foreign or missing card answers 403.

use crate::error::{ApiError, MessageBody};
use crate::extract::AuthUser;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use wordcards_core::{
    CardDraft, CardId, CardService, CoreError, ListId, QuizService, SqliteCardRepository,
    SqliteQuizRepository, ValidationError,
};

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    #[serde(default)]
    pub list_id: Option<i64>,
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub front_example: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub front_example: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    pub correct: bool,
}

pub async fn create(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<CreateCardRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let CreateCardRequest {
        list_id,
        front,
        front_example,
        back,
    } = body.into_inner();
    let list_id = list_id
        .map(ListId)
        .ok_or(CoreError::Validation(ValidationError::MissingCardFields))?;
    let draft = CardDraft::new(
        front.unwrap_or_default(),
        front_example,
        back.unwrap_or_default(),
    );
    let card = state
        .with_conn(move |conn| {
            let repo = SqliteCardRepository::try_new(conn)?;
            CardService::new(repo).create(owner, list_id, draft)
        })
        .await?;
    Ok(HttpResponse::Created().json(card))
}

pub async fn update(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateCardRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let card_id = CardId(path.into_inner());
    let UpdateCardRequest {
        front,
        front_example,
        back,
    } = body.into_inner();
    let draft = CardDraft::new(
        front.unwrap_or_default(),
        front_example,
        back.unwrap_or_default(),
    );
    let card = state
        .with_conn(move |conn| {
            let repo = SqliteCardRepository::try_new(conn)?;
            CardService::new(repo).update(owner, card_id, draft)
        })
        .await?;
    Ok(HttpResponse::Ok().json(card))
}

pub async fn delete(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let card_id = CardId(path.into_inner());
    state
        .with_conn(move |conn| {
            let repo = SqliteCardRepository::try_new(conn)?;
            CardService::new(repo).delete(owner, card_id)
        })
        .await?;
    Ok(HttpResponse::Ok().json(MessageBody::new("Card deleted")))
}

/// `POST /api/cards/{id}/attempts` → 201 with the recorded attempt.
pub async fn record_attempt(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<AttemptRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let card_id = CardId(path.into_inner());
    let correct = body.into_inner().correct;
    let attempt = state
        .with_conn(move |conn| {
            let repo = SqliteQuizRepository::try_new(conn)?;
            QuizService::new(repo).record(owner, card_id, correct)
        })
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}
