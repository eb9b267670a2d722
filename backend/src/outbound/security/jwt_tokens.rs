//! HS256 JSON Web Token implementation of the `TokenService` port.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessClaims, AccessToken, UserId};

/// Registered and private claims carried on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: UserId,
    username: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with a shared HMAC secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a token service from the shared secret and token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when the secret is empty.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::signing("signing secret must not be empty"));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| TokenError::signing("token lifetime out of range"))?;
        let wire = WireClaims {
            sub: claims.sub,
            username: claims.username.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        Ok(AccessClaims {
            sub: data.claims.sub,
            username: data.claims.username,
        })
    }
}
