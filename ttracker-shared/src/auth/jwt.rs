/// Access token verification
///
/// Tokens are issued by an external identity provider and signed with RS256.
/// The verification key is selected from the provider's published key set by
/// the token's `kid` header.
///
/// # Checks
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. Signature against the selected key
/// 2. Expiration (`exp`), with no leeway
/// 3. Issuer (`iss`) equals the configured issuer
/// 4. `token_use` is `"access"`
///
/// # Example
///
/// ```no_run
/// use jsonwebtoken::jwk::JwkSet;
/// use ttracker_shared::auth::jwt::{key_id, verify_access_token};
///
/// # fn example(token: &str, keys: &JwkSet) -> Result<(), Box<dyn std::error::Error>> {
/// let kid = key_id(token)?;
/// let jwk = keys.find(&kid).ok_or("unknown key")?;
/// let claims = verify_access_token(token, jwk, "https://issuer.example.com")?;
/// println!("Caller: {}", claims.sub);
/// # Ok(())
/// # }
/// ```

use jsonwebtoken::{decode, decode_header, jwk::Jwk, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Value of `token_use` that marks an access token
pub const ACCESS_TOKEN_USE: &str = "access";

/// Error type for token verification
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Token header could not be parsed
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Token header has no key ID
    #[error("Token header has no key ID")]
    MissingKeyId,

    /// Key ID is not in the published key set
    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    /// Published key could not be used for verification
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Signature or claims failed validation
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },

    /// Token is not an access token
    #[error("Invalid token use: expected access, got {0:?}")]
    WrongTokenUse(String),
}

/// Claims read from an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the caller's external identity
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token purpose; only `"access"` is accepted
    #[serde(default)]
    pub token_use: String,

    /// Username, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Reads the `kid` header without verifying anything
pub fn key_id(token: &str) -> Result<String, JwtError> {
    let header = decode_header(token).map_err(|e| JwtError::InvalidFormat(e.to_string()))?;
    header.kid.ok_or(JwtError::MissingKeyId)
}

/// Verifies an access token against a published key
///
/// # Errors
///
/// - `InvalidKey` if the JWK cannot be turned into a decoding key
/// - `Expired` if `exp` is in the past
/// - `InvalidIssuer` if `iss` differs from `issuer`
/// - `WrongTokenUse` if the token is not an access token
/// - `ValidationError` for any other signature or claim failure
pub fn verify_access_token(token: &str, jwk: &Jwk, issuer: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_jwk(jwk).map_err(|e| JwtError::InvalidKey(e.to_string()))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: issuer.to_string(),
        },
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    let claims = token_data.claims;
    if claims.token_use != ACCESS_TOKEN_USE {
        return Err(JwtError::WrongTokenUse(claims.token_use));
    }

    Ok(claims)
}
