/// Authentication against an external identity provider
///
/// # Modules
///
/// - [`jwks`]: Cached, periodically refreshed provider key set
/// - [`jwt`]: RS256 access token verification
/// - [`authenticator`]: Header parsing, verification gates and user provisioning
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use ttracker_shared::auth::{jwks::JwksCache, Authenticator};
/// use ttracker_shared::services::UserService;
/// use ttracker_shared::storage::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let jwks = Arc::new(JwksCache::new(
///     "https://issuer.example.com/.well-known/jwks.json",
///     Duration::from_secs(3600),
///     Duration::from_secs(10),
/// )?);
/// let users = UserService::new(Arc::new(MemoryStore::new()));
/// let authenticator = Authenticator::new(jwks, "https://issuer.example.com", users);
///
/// let auth = authenticator.authenticate(Some("Bearer eyJ...")).await?;
/// println!("Caller: {}", auth.cognito_id);
/// # Ok(())
/// # }
/// ```

pub mod authenticator;
pub mod jwks;
pub mod jwt;

pub use authenticator::{AuthContext, AuthError, Authenticator};
