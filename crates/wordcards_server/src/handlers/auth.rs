use crate::error::ApiError;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use wordcards_core::{CredentialService, NewUser, SqliteUserRepository};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `POST /api/auth/register` → 201 with the new user.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let RegisterRequest {
        username,
        email,
        password,
    } = body.into_inner();
    let user = state
        .with_conn_and_tokens(move |conn, tokens| {
            let repo = SqliteUserRepository::try_new(conn)?;
            let user = NewUser::new(
                username.unwrap_or_default(),
                email.unwrap_or_default(),
                password.unwrap_or_default(),
            );
            CredentialService::new(repo, tokens).register(user)
        })
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// `POST /api/auth/login` → `{user, token}`.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { email, password } = body.into_inner();
    let (email, password) = (email.unwrap_or_default(), password.unwrap_or_default());
    let session = state
        .with_conn_and_tokens(move |conn, tokens| {
            let repo = SqliteUserRepository::try_new(conn)?;
            CredentialService::new(repo, tokens).authenticate(&email, &password)
        })
        .await?;
    Ok(HttpResponse::Ok().json(session))
}
