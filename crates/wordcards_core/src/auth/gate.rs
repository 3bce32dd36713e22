//! Per-request authorization gate.
//!
//! # Responsibility
//! - Drive one request from the raw `Authorization` header to either a typed
//!   [`Identity`] or a [`Rejection`].
//!
//! # Invariants
//! - A missing token is rejected without consulting the verifier.
//! - Terminal states (`Verified`, `Rejected`) never advance further.

use super::token::TokenVerifier;
use crate::model::ids::UserId;
use log::debug;
use serde::{Deserialize, Serialize};

const BEARER_SCHEME: &str = "Bearer";

/// Verified identity injected into protected operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
}

/// Why a request was turned away before reaching any store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No header, or a header without a token part.
    MissingToken,
    /// Wrong scheme, bad signature, malformed or expired token.
    InvalidToken,
}

impl Rejection {
    pub fn status_code(self) -> u16 {
        match self {
            Self::MissingToken => 401,
            Self::InvalidToken => 403,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "No token provided",
            Self::InvalidToken => "Invalid token",
        }
    }
}

/// Gate state for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState<'h> {
    Unauthenticated(Option<&'h str>),
    TokenPresent { scheme: &'h str, token: &'h str },
    Verified(Identity),
    Rejected(Rejection),
}

impl<'h> GateState<'h> {
    pub fn start(header: Option<&'h str>) -> Self {
        Self::Unauthenticated(header)
    }

    /// Performs one transition.
    pub fn advance(self, verifier: &impl TokenVerifier) -> Self {
        match self {
            Self::Unauthenticated(header) => match split_header(header) {
                Some((scheme, token)) => Self::TokenPresent { scheme, token },
                None => Self::Rejected(Rejection::MissingToken),
            },
            Self::TokenPresent { scheme, token } => {
                if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
                    return Self::Rejected(Rejection::InvalidToken);
                }
                match verifier.verify_token(token) {
                    Ok(id) => Self::Verified(Identity { id }),
                    Err(err) => {
                        debug!("event=token_verify module=auth status=rejected error={err}");
                        Self::Rejected(Rejection::InvalidToken)
                    }
                }
            }
            terminal => terminal,
        }
    }
}

/// Runs the gate to completion.
pub fn authorize(
    header: Option<&str>,
    verifier: &impl TokenVerifier,
) -> Result<Identity, Rejection> {
    let mut state = GateState::start(header);
    loop {
        state = match state {
            GateState::Verified(identity) => return Ok(identity),
            GateState::Rejected(rejection) => return Err(rejection),
            pending => pending.advance(verifier),
        };
    }
}

fn split_header(header: Option<&str>) -> Option<(&str, &str)> {
    let mut parts = header?.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    Some((scheme, token))
}

#[cfg(test)]
mod tests {
    use super::{authorize, GateState, Identity, Rejection};
    use crate::auth::token::{TokenError, TokenService, TokenVerifier};
    use crate::model::ids::UserId;
    use std::cell::Cell;
    use std::time::Duration;

    struct CountingVerifier {
        inner: TokenService,
        calls: Cell<u32>,
    }

    impl TokenVerifier for CountingVerifier {
        fn verify_token(&self, token: &str) -> Result<UserId, TokenError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.verify_token(token)
        }
    }

    fn verifier() -> CountingVerifier {
        CountingVerifier {
            inner: TokenService::new(b"gate-secret", Duration::from_secs(60)),
            calls: Cell::new(0),
        }
    }

    #[test]
    fn missing_header_is_rejected_without_verification() {
        let verifier = verifier();
        assert_eq!(authorize(None, &verifier), Err(Rejection::MissingToken));
        assert_eq!(authorize(Some("Bearer"), &verifier), Err(Rejection::MissingToken));
        assert_eq!(authorize(Some("   "), &verifier), Err(Rejection::MissingToken));
        assert_eq!(verifier.calls.get(), 0);
    }

    #[test]
    fn invalid_token_is_rejected_after_verification() {
        let verifier = verifier();
        assert_eq!(
            authorize(Some("Bearer garbage"), &verifier),
            Err(Rejection::InvalidToken)
        );
        assert_eq!(verifier.calls.get(), 1);
    }

    #[test]
    fn non_bearer_scheme_is_invalid() {
        let verifier = verifier();
        let token = verifier.inner.issue(UserId(3)).unwrap();
        let header = format!("Basic {}", token.as_str());
        assert_eq!(
            authorize(Some(header.as_str()), &verifier),
            Err(Rejection::InvalidToken)
        );
    }

    #[test]
    fn valid_bearer_token_yields_typed_identity() {
        let verifier = verifier();
        let token = verifier.inner.issue(UserId(3)).unwrap();
        let header = format!("Bearer {}", token.as_str());
        assert_eq!(
            authorize(Some(header.as_str()), &verifier),
            Ok(Identity { id: UserId(3) })
        );
    }

    #[test]
    fn transitions_follow_expected_sequence() {
        let verifier = verifier();
        let token = verifier.inner.issue(UserId(9)).unwrap();
        let header = format!("Bearer {}", token.as_str());

        let state = GateState::start(Some(header.as_str()));
        let state = state.advance(&verifier);
        assert!(matches!(state, GateState::TokenPresent { scheme: "Bearer", .. }));
        let state = state.advance(&verifier);
        assert_eq!(state, GateState::Verified(Identity { id: UserId(9) }));
        assert_eq!(
            state.clone().advance(&verifier),
            GateState::Verified(Identity { id: UserId(9) })
        );
    }

    #[test]
    fn rejection_maps_to_status_and_message() {
        assert_eq!(Rejection::MissingToken.status_code(), 401);
        assert_eq!(Rejection::MissingToken.message(), "No token provided");
        assert_eq!(Rejection::InvalidToken.status_code(), 403);
        assert_eq!(Rejection::InvalidToken.message(), "Invalid token");
    }
}
