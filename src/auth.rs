//! Bearer credential gate in front of the pipeline routes.
//!
//! Identity lives elsewhere; this module only checks that a request carries a credential the
//! configured [`CredentialVerifier`] accepts and hands the identified [`Caller`] to handlers.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

/// Identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Stable, non-secret identifier for logs.
    pub id: String,
}

/// Reasons a request fails the credential gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// No bearer credential was supplied.
    #[error("Missing bearer credential")]
    Missing,
    /// The credential was not accepted.
    #[error("Invalid bearer credential")]
    Invalid,
}

/// Validates bearer credentials issued by the identity service.
pub trait CredentialVerifier: Send + Sync {
    /// Resolve `token` to a caller, or reject it.
    fn verify(&self, token: &str) -> Result<Caller, CredentialError>;
}

/// Accepts a fixed set of tokens. Only SHA-256 digests are kept in memory.
pub struct StaticTokenVerifier {
    digests: Vec<[u8; 32]>,
}

impl StaticTokenVerifier {
    /// Build a verifier that accepts any of `tokens`.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            digests: tokens
                .into_iter()
                .map(|token| digest(token.as_ref()))
                .collect(),
        }
    }
}

impl CredentialVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<Caller, CredentialError> {
        let candidate = digest(token);
        if self.digests.iter().any(|known| *known == candidate) {
            Ok(Caller {
                id: format!("token-{}", hex::encode(&candidate[..4])),
            })
        } else {
            Err(CredentialError::Invalid)
        }
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, CredentialError> {
    let value = header.ok_or(CredentialError::Missing)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or(CredentialError::Missing)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(CredentialError::Missing);
    }
    Ok(token)
}

/// Axum middleware: verify the bearer credential and stash the [`Caller`] in request extensions.
pub async fn require_bearer(
    State(verifier): State<Arc<dyn CredentialVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, CredentialError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let caller = bearer_token(header).and_then(|token| verifier.verify(token));
    match caller {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            Ok(next.run(request).await)
        }
        Err(error) => {
            tracing::debug!(error = %error, path = %request.uri().path(), "Rejected request");
            Err(error)
        }
    }
}
