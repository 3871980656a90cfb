//! Admin access gate: password login and bearer credential checks.
//!
//! The gate is built from an explicit [`AuthConfig`] so tests can inject
//! their own hash, signing secret and clock. Successful checks yield an
//! [`AdminPrincipal`], which only this module can construct; moderation
//! operations demand one as an argument.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use super::{ActorType, Error, ErrorCode, RequestActor};

/// Default lifetime of an issued admin credential.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const ADMIN_SUBJECT: &str = "admin";
const BEARER_PREFIX: &str = "Bearer ";

/// Errors raised while assembling the gate from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthConfigError {
    #[error("admin password hash is not a valid PHC string: {0}")]
    InvalidPasswordHash(String),
    #[error("signing secret must not be empty")]
    EmptySigningSecret,
    #[error("token lifetime must be between one second and one year")]
    InvalidTokenTtl,
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Secrets and limits the gate is built from.
#[derive(Clone)]
pub struct AuthConfig {
    pub admin_password_hash: Zeroizing<String>,
    pub signing_secret: Zeroizing<Vec<u8>>,
    pub token_ttl: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_password_hash", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Password submitted to the login endpoint.
///
/// Whitespace is preserved; the buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminPassword(Zeroizing<String>);

impl AdminPassword {
    /// Wrap a non-empty password.
    ///
    /// # Errors
    /// Returns a validation error when `raw` is empty.
    pub fn try_new(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::validation(vec![super::FieldViolation::new(
                "password",
                "must not be empty",
            )]));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPassword(<redacted>)")
    }
}

/// Claims carried by the signed credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    #[serde(default)]
    admin: bool,
    sub: String,
    iat: i64,
    exp: i64,
}

/// A signed credential returned by [`AccessGate::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Proof that a request carried a valid admin credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    subject: String,
}

impl AdminPrincipal {
    pub(crate) fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// An authenticated admin plus the request metadata recorded in the ledger.
///
/// Only constructible from an [`AdminPrincipal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    actor: RequestActor,
}

impl AdminContext {
    /// Bind `principal` to the request it arrived on.
    #[must_use]
    pub fn new(
        principal: AdminPrincipal,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        let actor = RequestActor {
            user_id: Some(principal.subject),
            user_type: ActorType::Admin,
            ip_address,
            user_agent,
        };
        Self { actor }
    }

    #[must_use]
    pub const fn actor(&self) -> &RequestActor {
        &self.actor
    }
}

/// Verifies the admin password and the bearer credentials it yields.
pub struct AccessGate {
    password_hash: Zeroizing<String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl AccessGate {
    /// Build a gate, rejecting unusable configuration up front.
    ///
    /// # Errors
    /// Returns [`AuthConfigError`] for a malformed hash, an empty secret or
    /// an out-of-range lifetime.
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthConfigError> {
        PasswordHash::new(config.admin_password_hash.as_str())
            .map_err(|err| AuthConfigError::InvalidPasswordHash(err.to_string()))?;
        if config.signing_secret.is_empty() {
            return Err(AuthConfigError::EmptySigningSecret);
        }
        let token_ttl = TimeDelta::from_std(config.token_ttl)
            .ok()
            .filter(|ttl| *ttl >= TimeDelta::seconds(1) && *ttl <= TimeDelta::days(366))
            .ok_or(AuthConfigError::InvalidTokenTtl)?;

        // Expiry is checked against the injected clock in `authenticate`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Ok(Self {
            password_hash: config.admin_password_hash,
            encoding_key: EncodingKey::from_secret(&config.signing_secret),
            decoding_key: DecodingKey::from_secret(&config.signing_secret),
            validation,
            token_ttl,
            clock,
        })
    }

    /// Exchange the admin password for a signed credential.
    ///
    /// Argon2 verification runs on the blocking thread pool.
    ///
    /// # Errors
    /// `INVALID_CREDENTIALS` on mismatch; `INTERNAL_SERVER_ERROR` if the
    /// token cannot be signed.
    pub async fn login(&self, password: &AdminPassword) -> Result<IssuedCredential, Error> {
        let hash = self.password_hash.clone();
        let candidate = password.clone();
        tokio::task::spawn_blocking(move || verify_password(&hash, &candidate))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))??;

        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.token_ttl;
        let claims = Claims {
            admin: true,
            sub: ADMIN_SUBJECT.to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| Error::internal(format!("failed to sign credential: {err}")))?;
        Ok(IssuedCredential { token, expires_at })
    }

    /// Check an `Authorization` header value.
    ///
    /// # Errors
    /// - `UNAUTHORIZED` when the header is absent, not a bearer credential,
    ///   badly signed or expired;
    /// - `FORBIDDEN` when the credential is valid but lacks admin rights.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AdminPrincipal, Error> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("Authorization token required"))?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            warn!(error = %err, "bearer credential rejected");
            Error::unauthorized("Invalid or expired token")
        })?;

        let Claims { admin, sub, exp, .. } = data.claims;
        if exp <= self.clock.utc().timestamp() {
            return Err(Error::unauthorized("Invalid or expired token"));
        }
        if !admin {
            return Err(Error::forbidden("Admin access required"));
        }
        Ok(AdminPrincipal::new(sub))
    }
}

fn verify_password(stored: &str, password: &AdminPassword) -> Result<(), Error> {
    let hash = PasswordHash::new(stored)
        .map_err(|err| Error::internal(format!("stored admin hash unreadable: {err}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &hash) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => {
            warn!("admin login rejected");
            Err(Error::from_code(ErrorCode::InvalidCredentials))
        }
        Err(err) => Err(Error::internal(format!("password verification failed: {err}"))),
    }
}

/// Hash `password` into an argon2id PHC string with a random salt.
///
/// # Errors
/// Returns [`AuthConfigError::Hashing`] if hashing fails.
///
/// # Examples
/// ```
/// use wedding_backend::domain::hash_admin_password;
///
/// let hash = hash_admin_password("correct horse").expect("hash");
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_admin_password(password: &str) -> Result<String, AuthConfigError> {
    let mut salt_bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| AuthConfigError::Hashing(err.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthConfigError::Hashing(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};
    use std::sync::OnceLock;

    const PASSWORD: &str = "wedding2024";
    const SECRET: &[u8] = b"test-signing-secret";

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn password_hash() -> String {
        static HASH: OnceLock<String> = OnceLock::new();
        HASH.get_or_init(|| hash_admin_password(PASSWORD).expect("hash password"))
            .clone()
    }

    fn config(secret: &[u8]) -> AuthConfig {
        AuthConfig {
            admin_password_hash: Zeroizing::new(password_hash()),
            signing_secret: Zeroizing::new(secret.to_vec()),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    fn gate_at(now: DateTime<Utc>) -> AccessGate {
        AccessGate::new(config(SECRET), Arc::new(FixedClock(now))).expect("valid config")
    }

    #[fixture]
    fn gate() -> AccessGate {
        gate_at(Utc::now())
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_day_long_credential() {
        let now = Utc::now();
        let gate = gate_at(now);
        let password = AdminPassword::try_new(PASSWORD).expect("password");
        let issued = gate.login(&password).await.expect("login succeeds");
        let principal = gate
            .authenticate(Some(&bearer(&issued.token)))
            .expect("token accepted");
        assert_eq!(principal.subject(), "admin");
        assert_eq!(issued.expires_at - now, TimeDelta::hours(24));
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_invalid_credentials(gate: AccessGate) {
        let password = AdminPassword::try_new("guess").expect("password");
        let err = gate.login(&password).await.expect_err("mismatch");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer "))]
    #[case(Some("token-without-scheme"))]
    fn missing_or_malformed_header_is_unauthorized(
        gate: AccessGate,
        #[case] header: Option<&str>,
    ) {
        let err = gate.authenticate(header).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Authorization token required");
    }

    #[rstest]
    fn garbage_token_is_unauthorized(gate: AccessGate) {
        let err = gate
            .authenticate(Some("Bearer not.a.jwt"))
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid or expired token");
    }

    #[rstest]
    #[tokio::test]
    async fn token_signed_with_other_secret_is_unauthorized(gate: AccessGate) {
        let other = AccessGate::new(config(b"another-secret"), Arc::new(FixedClock(Utc::now())))
            .expect("valid config");
        let password = AdminPassword::try_new(PASSWORD).expect("password");
        let issued = other.login(&password).await.expect("login");
        let err = gate
            .authenticate(Some(&bearer(&issued.token)))
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn expired_token_is_unauthorized(gate: AccessGate) {
        let long_ago = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let password = AdminPassword::try_new(PASSWORD).expect("password");
        let issued = gate_at(long_ago).login(&password).await.expect("login");
        let err = gate
            .authenticate(Some(&bearer(&issued.token)))
            .expect_err("expired");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn non_admin_token_is_forbidden(gate: AccessGate) {
        let now = Utc::now();
        let claims = Claims {
            admin: false,
            sub: "guest".to_owned(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("sign");
        let err = gate.authenticate(Some(&bearer(&token))).expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn malformed_hash_is_rejected_at_construction() {
        let config = AuthConfig {
            admin_password_hash: Zeroizing::new("plaintext".to_owned()),
            ..config(SECRET)
        };
        let result = AccessGate::new(config, Arc::new(FixedClock(Utc::now())));
        assert!(matches!(result, Err(AuthConfigError::InvalidPasswordHash(_))));
    }

    #[rstest]
    fn empty_secret_is_rejected() {
        let result = AccessGate::new(config(b""), Arc::new(FixedClock(Utc::now())));
        assert!(matches!(result, Err(AuthConfigError::EmptySigningSecret)));
    }

    #[rstest]
    fn empty_password_fails_validation() {
        let err = AdminPassword::try_new("").expect_err("empty");
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
