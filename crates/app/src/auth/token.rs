//! Signed access tokens.

use std::{fmt, time::Duration};

use jiff::Timestamp;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{domain::users::records::UserUuid, sessions::SessionId};

/// Issuer embedded in, and required of, every token.
pub const TOKEN_ISSUER: &str = "todo-app";

const SECONDS_PER_HOUR: u64 = 3600;

/// HMAC key for signing tokens. Wiped from memory on drop.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Process-wide token configuration.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: SigningSecret,
    pub lifetime_hours: u64,
}

impl TokenSettings {
    /// How long a token, and the session bound to it, stays valid.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_hours.saturating_mul(SECONDS_PER_HOUR))
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// External UUID of the authenticated user.
    pub sub: Uuid,

    /// Session the token is bound to.
    pub sid: String,

    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed or its signature is invalid")]
    Invalid(#[source] JwtError),

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token")]
    Signing(#[source] JwtError),
}

impl From<JwtError> for TokenError {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(error),
        }
    }
}

/// Mints and validates access tokens.
#[automock]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user` bound to `session`.
    fn mint(&self, user: UserUuid, session: &SessionId) -> Result<String, TokenError>;

    /// Check signature, issuer and expiry, returning the claims.
    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError>;

    /// Lifetime of newly minted tokens.
    fn lifetime(&self) -> Duration;
}

/// HS256 JSON Web Tokens.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl JwtTokenIssuer {
    #[must_use]
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            lifetime: settings.lifetime(),
        }
    }
}

impl fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn mint(&self, user: UserUuid, session: &SessionId) -> Result<String, TokenError> {
        let issued_at = Timestamp::now().as_second();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);

        let claims = TokenClaims {
            sub: user.into_uuid(),
            sid: session.as_str().to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)?;

        Ok(data.claims)
    }

    fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
