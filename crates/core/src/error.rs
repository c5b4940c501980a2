use std::fmt;

/// Why an access token was rejected by [`TokenCodec::parse`](crate::token::TokenCodec::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// The `exp` claim is in the past.
    Expired,
    /// The signature does not verify under the configured key.
    Signature,
    /// The header names an algorithm outside the HMAC family.
    Algorithm,
    /// Anything else: bad encoding, missing claims, wrong claim types.
    Malformed,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TokenRejection::Expired => "token has expired",
            TokenRejection::Signature => "signature does not verify",
            TokenRejection::Algorithm => "unsupported signing algorithm",
            TokenRejection::Malformed => "token is malformed",
        };
        f.write_str(reason)
    }
}

/// Errors produced by the session lifecycle core.
///
/// `Entropy`, `Signing`, `Persistence` and `Internal` are server faults; the
/// rest are caused by the caller. Client-fault messages are safe to return to callers and never include
/// hashes or secrets; internal messages are meant for server logs only.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),

    #[error("Failed to sign access token: {0}")]
    Signing(String),

    #[error("Session persistence failed: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("No session exists for this client")]
    NotFound,

    #[error("Refresh token is not valid for this session")]
    InvalidCredential,

    #[error("Refresh token has expired")]
    Expired,

    #[error("Session was modified by a concurrent refresh")]
    Conflict,

    #[error("Access token rejected: {0}")]
    InvalidToken(TokenRejection),

    #[error("Validation failed: {0}")]
    Validation(String),
}
