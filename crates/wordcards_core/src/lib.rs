//! Core domain logic for wordcards.
//! This crate is the single source of truth for ownership invariants: every
//! word list and card operation is bound to the authenticated owner here.

pub mod auth;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod ownership;
pub mod repo;
pub mod service;

pub use auth::gate::{authorize, GateState, Identity, Rejection};
pub use auth::token::{Claims, SessionToken, TokenService, TokenVerifier, DEFAULT_TOKEN_TTL};
pub use db::{open_db, open_db_in_memory, DbError, DbLocation, DbPool, PooledConnection};
pub use error::{AuthFailure, CoreError, CoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::card::{Card, CardDraft};
pub use model::ids::{AttemptId, CardId, ListId, UserId};
pub use model::quiz::QuizAttempt;
pub use model::user::{NewUser, User};
pub use model::validation::ValidationError;
pub use model::word_list::{WordList, WordListDetail, WordListDraft};
pub use ownership::{CardChain, EntityRef, Ownership, OwnershipResolver};
pub use repo::card_repo::{CardRepository, SqliteCardRepository};
pub use repo::quiz_repo::{QuizRepository, SqliteQuizRepository};
pub use repo::user_repo::{SqliteUserRepository, StoredCredentials, UserRepository};
pub use repo::word_list_repo::{SqliteWordListRepository, WordListRepository};
pub use repo::{RepoError, RepoResult};
pub use service::card_service::{CardService, QuizService};
pub use service::credential_service::{AuthSession, CredentialService};
pub use service::word_list_service::WordListService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
