//! `/api/wordlists` handlers. Every query is scoped to the caller; foreign
//! lists answer 404 exactly like missing ones.

use crate::error::{ApiError, MessageBody};
use crate::extract::AuthUser;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use wordcards_core::{ListId, SqliteWordListRepository, WordListDraft, WordListService};

#[derive(Debug, Deserialize)]
pub struct WordListRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WordListRequest {
    fn into_draft(self) -> WordListDraft {
        WordListDraft::new(self.title.unwrap_or_default(), self.description)
    }
}

pub async fn create(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<WordListRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let draft = body.into_inner().into_draft();
    let list = state
        .with_conn(move |conn| {
            let repo = SqliteWordListRepository::try_new(conn)?;
            WordListService::new(repo).create(owner, draft)
        })
        .await?;
    Ok(HttpResponse::Created().json(list))
}

pub async fn list(user: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let lists = state
        .with_conn(move |conn| {
            let repo = SqliteWordListRepository::try_new(conn)?;
            WordListService::new(repo).list_by_owner(owner)
        })
        .await?;
    Ok(HttpResponse::Ok().json(lists))
}

pub async fn get(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let list_id = ListId(path.into_inner());
    let detail = state
        .with_conn(move |conn| {
            let repo = SqliteWordListRepository::try_new(conn)?;
            WordListService::new(repo).get_with_cards(owner, list_id)
        })
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn update(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<WordListRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let list_id = ListId(path.into_inner());
    let draft = body.into_inner().into_draft();
    let list = state
        .with_conn(move |conn| {
            let repo = SqliteWordListRepository::try_new(conn)?;
            WordListService::new(repo).update(owner, list_id, draft)
        })
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

pub async fn delete(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let list_id = ListId(path.into_inner());
    state
        .with_conn(move |conn| {
            let repo = SqliteWordListRepository::try_new(conn)?;
            WordListService::new(repo).delete(owner, list_id)
        })
        .await?;
    Ok(HttpResponse::Ok().json(MessageBody::new("Word list deleted")))
}
