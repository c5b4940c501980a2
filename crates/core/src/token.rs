//! JWT access-token encoding and validation.
//!
//! Access tokens are HS512-signed JWTs carrying an [`AccessClaims`] payload.
//! They are never stored server-side. Validation accepts only the HMAC family
//! so a token whose header names an asymmetric algorithm (or `none`) cannot be
//! verified against the shared secret.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, TokenRejection};
use crate::types::{expiry_after, Timestamp};

/// Algorithm used when signing.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Algorithms accepted when parsing.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject -- the client GUID.
    pub sub: String,
    /// Client IP the token was issued to.
    pub ip: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

impl AccessClaims {
    /// The `exp` claim as a timestamp.
    pub fn expires_at(&self) -> Timestamp {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A signed token and the expiry written into it.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Signs and validates access tokens with one HMAC key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec for the given shared secret.
    pub fn new(signing_key: &str) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `guid` bound to `client_ip`, valid for `ttl`.
    pub fn issue(
        &self,
        guid: &str,
        client_ip: &str,
        ttl: Duration,
    ) -> Result<IssuedAccessToken, CoreError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl)
            .ok_or_else(|| CoreError::Signing(format!("Token lifetime {ttl} is out of range")))?;

        let claims = AccessClaims {
            sub: guid.to_string(),
            ip: client_ip.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| CoreError::Signing(e.to_string()))?;

        Ok(IssuedAccessToken { token, expires_at })
    }

    /// Validate signature, algorithm family and expiry, returning the claims.
    pub fn parse(&self, token: &str) -> Result<AccessClaims, CoreError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| CoreError::InvalidToken(rejection_for(e.kind())))
    }
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature => TokenRejection::Signature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenRejection::Algorithm
        }
        _ => TokenRejection::Malformed,
    }
}
