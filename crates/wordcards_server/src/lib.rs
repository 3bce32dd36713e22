//! HTTP surface for wordcards.
//!
//! Routes live under `/api`; everything except health, register and login
//! requires `Authorization: Bearer <token>`.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use extract::AuthUser;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use rusqlite::Connection;
use std::sync::Arc;
use wordcards_core::{CoreResult, DbLocation, DbPool, TokenService};

/// Shared per-process state injected into every handler.
pub struct AppState {
    pool: DbPool,
    tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(pool: DbPool, tokens: TokenService) -> Self {
        Self {
            pool,
            tokens: Arc::new(tokens),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Runs one blocking storage operation on a pooled connection.
    pub async fn with_conn<F, T>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let result = web::block(move || {
            let mut conn = pool.get()?;
            op(&mut *conn)
        })
        .await?;
        result.map_err(ApiError::from)
    }

    /// Like [`Self::with_conn`], also handing the operation the token service.
    pub async fn with_conn_and_tokens<F, T>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection, &TokenService) -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let tokens = Arc::clone(&self.tokens);
        self.with_conn(move |conn| op(conn, tokens.as_ref())).await
    }
}

/// Registers every route plus JSON/path error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| {
            log::debug!("event=body_rejected module=server status=400 error={err}");
            ApiError::BadRequest.into()
        }),
    )
    .app_data(web::PathConfig::default().error_handler(|_err, _req| ApiError::NotFound.into()))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login)),
            )
            .service(
                web::scope("/wordlists")
                    .route("", web::post().to(handlers::word_lists::create))
                    .route("", web::get().to(handlers::word_lists::list))
                    .route("/{id}", web::get().to(handlers::word_lists::get))
                    .route("/{id}", web::put().to(handlers::word_lists::update))
                    .route("/{id}", web::delete().to(handlers::word_lists::delete)),
            )
            .service(
                web::scope("/cards")
                    .route("", web::post().to(handlers::cards::create))
                    .route("/{id}", web::put().to(handlers::cards::update))
                    .route("/{id}", web::delete().to(handlers::cards::delete))
                    .route("/{id}/attempts", web::post().to(handlers::cards::record_attempt)),
            ),
    );
}

/// Opens the database, then serves until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    config.validate().map_err(std::io::Error::other)?;

    let pool = DbPool::open(
        DbLocation::File(config.database_path.clone()),
        config.db_pool_size,
    )
    .map_err(|err| std::io::Error::other(err.to_string()))?;
    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl);
    let state = web::Data::new(AppState::new(pool, tokens));

    info!(
        "event=server_start module=server status=ok bind={} workers={} pool_size={}",
        config.bind_addr, config.http_workers, config.db_pool_size
    );
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(state.clone())
            .configure(configure)
    })
    .workers(config.http_workers)
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
