// Token material and expiry bookkeeping.
//
// Expirations are tracked as absolute timestamps rather than TTL
// counters so repeated checks don't accumulate clock drift. Access-token
// expiry is read from the JWT payload without signature verification:
// the server is the authority, the claim is only a hint for refreshing
// proactively.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

/// Safety margin for expiry checks. A token this close to its deadline
/// is treated as already expired.
pub(crate) const EXPIRY_SKEW_SECS: i64 = 60;

/// Login material for one Ufanet contract.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Contract number -- the account identifier used as the username.
    pub contract: String,
    /// Account password. Optional: a client seeded with a refresh token
    /// can run without it until that token expires.
    pub password: Option<SecretString>,
    /// Refresh token carried over from a previous session, if any.
    pub refresh_token: Option<String>,
    /// Absolute expiry of the seeded refresh token, if known.
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Password-login credentials (initial setup).
    pub fn with_password(contract: impl Into<String>, password: SecretString) -> Self {
        Self {
            contract: contract.into(),
            password: Some(password),
            ..Self::default()
        }
    }

    /// Seed from a persisted refresh token; no password held in memory.
    pub fn with_refresh_token(
        contract: impl Into<String>,
        refresh_token: impl Into<String>,
        refresh_expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            contract: contract.into(),
            refresh_token: Some(refresh_token.into()),
            refresh_expires_at,
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("contract", &self.contract)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

/// Snapshot of the token material after a successful login or refresh,
/// handed to the token sink so the host can persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUpdate {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

/// Host-supplied persistence callback, invoked synchronously after every
/// token change, in the order tokens were obtained. An error from the
/// sink fails the call that obtained the tokens.
pub type TokenSink =
    Box<dyn Fn(&TokenUpdate) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

/// In-memory token state owned by one client instance.
#[derive(Debug, Default, Clone)]
pub(crate) struct TokenState {
    pub access: Option<String>,
    pub access_expires_at: Option<DateTime<Utc>>,
    pub refresh: Option<String>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// True if we hold an access token that is not about to expire.
    /// Unknown expiry counts as expiring.
    pub fn access_usable(&self, now: DateTime<Utc>) -> bool {
        self.access.is_some() && !is_expiring(self.access_expires_at, now)
    }

    /// True if a refresh attempt is worth making: a refresh token exists
    /// and is not known-expired. Unknown expiry gets the benefit of the
    /// doubt here -- the server will reject it if it's stale.
    pub fn refresh_usable(&self, now: DateTime<Utc>) -> bool {
        self.refresh.is_some()
            && self
                .refresh_expires_at
                .is_none_or(|exp| now < exp - Duration::seconds(EXPIRY_SKEW_SECS))
    }
}

/// Whether a token with the given absolute expiry should be considered
/// expired, with the skew applied. `None` means "don't know": expired.
pub(crate) fn is_expiring(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        None => true,
        Some(exp) => now >= exp - Duration::seconds(EXPIRY_SKEW_SECS),
    }
}

/// Extract the `exp` claim from a JWT payload without verifying the
/// signature. Returns `None` for anything that doesn't look like a JWT.
pub(crate) fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };

    #[derive(serde::Deserialize)]
    struct Claims {
        exp: Option<i64>,
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn fake_jwt(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn jwt_expiry_reads_exp_claim() {
        let exp = Utc::now().timestamp() + 3600;
        let token = fake_jwt(&format!(r#"{{"exp":{exp}}}"#));
        assert_eq!(jwt_expiry(&token).unwrap().timestamp(), exp);
    }

    #[test]
    fn jwt_expiry_rejects_non_jwt_input() {
        assert!(jwt_expiry("opaque-token").is_none());
        assert!(jwt_expiry("two.parts").is_none());
        assert!(jwt_expiry("a.b.c.d").is_none());
        assert!(jwt_expiry(&fake_jwt(r#"{"sub":"x"}"#)).is_none());
    }

    #[test]
    fn is_expiring_applies_skew() {
        let now = Utc::now();
        assert!(is_expiring(Some(now + Duration::seconds(30)), now));
        assert!(!is_expiring(Some(now + Duration::seconds(120)), now));
        assert!(is_expiring(Some(now - Duration::seconds(1)), now));
        assert!(is_expiring(None, now));
    }

    #[test]
    fn refresh_with_unknown_expiry_is_usable() {
        let now = Utc::now();
        let state = TokenState {
            refresh: Some("r".into()),
            ..TokenState::default()
        };
        assert!(state.refresh_usable(now));
        assert!(!state.access_usable(now));
    }

    #[test]
    fn expired_refresh_is_not_usable() {
        let now = Utc::now();
        let state = TokenState {
            refresh: Some("r".into()),
            refresh_expires_at: Some(now - Duration::seconds(10)),
            ..TokenState::default()
        };
        assert!(!state.refresh_usable(now));
    }
}
