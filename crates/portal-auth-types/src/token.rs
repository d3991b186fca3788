//! Session JWT validation and issuance.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;
use uuid::Uuid;

use portal_domain::user::UserRole;

/// Session credential lifetime in seconds (8 hours).
pub const SESSION_TOKEN_EXP: u64 = 28800;

/// Identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub role: UserRole,
    pub first_access: bool,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token encoding failed")]
    Encoding,
}

/// JWT claims payload embedded in every session credential.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `role` | custom | `"USER"`, `"ADMIN"` or `"SUPPORT"` |
/// | `first_access` | custom | credential change pending |
/// | `exp` | `exp` | seconds since epoch |
///
/// [`Serialize`] requires the **`issuer`** cargo feature.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub role: UserRole,
    #[serde(default)]
    pub first_access: bool,
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// HS256, `exp` checked with zero leeway, required claims: `exp` + `sub`.
fn decode_jwt(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a session credential, returning the embedded identity.
///
/// No store round-trip: everything needed for the authorization decision is
/// carried by the signed claims.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, TokenError> {
    let claims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        role: claims.role,
        first_access: claims.first_access,
        expires_at: claims.exp,
    })
}

// ── Feature-gated: issuer only ───────────────────────────────────────────

#[cfg(any(feature = "issuer", test))]
fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign a new session credential. Returns `(token, exp)`.
#[cfg(any(feature = "issuer", test))]
pub fn issue_session_token(
    user_id: Uuid,
    role: UserRole,
    first_access: bool,
    secret: &str,
) -> Result<(String, u64), TokenError> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let exp = now_secs() + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        role,
        first_access,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Encoding)?;
    Ok((token, exp))
}
