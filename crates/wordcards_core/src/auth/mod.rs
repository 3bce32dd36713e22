//! Credential primitives: password hashing, session tokens, request gate.
//!
//! # Responsibility
//! - Hash and verify passwords (Argon2, PHC strings).
//! - Issue and verify HS256 session tokens carrying `{id, iat, exp}`.
//! - Turn an `Authorization` header into a typed identity or a rejection.

pub mod gate;
pub mod password;
pub mod token;
