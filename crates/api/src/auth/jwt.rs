//! Session tokens.
//!
//! A signed-in reader holds one HS256 token naming their account and role.
//! Nothing is stored server-side, so signing out only drops the token on the
//! client.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reelnotes_core::roles::ROLE_ADMIN;
use reelnotes_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifetime when `JWT_ACCESS_EXPIRY_MINS` is unset: one day.
const DEFAULT_SESSION_MINS: i64 = 24 * 60;

/// Payload of a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    /// [`ROLE_ADMIN`] or `"user"`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    fn issue(user_id: DbId, role: &str, lifetime_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            role: role.to_string(),
            exp: now + lifetime_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 1440).
    ///
    /// # Panics
    ///
    /// On a missing secret or an unparsable lifetime.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = get("JWT_ACCESS_EXPIRY_MINS")
            .map(|mins| {
                mins.parse()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes")
            })
            .unwrap_or(DEFAULT_SESSION_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Session lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        Validation::new(Algorithm::HS256)
    }
}

/// Sign a session token for `user_id`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::issue(user_id, role, config.expires_in_secs());
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check the signature and expiry of a session token.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 30,
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn session_token_carries_account_and_role() {
        let config = config("reelnotes-session-secret");
        let token = generate_access_token(7, ROLE_ADMIN, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert!(claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn reader_token_is_not_admin() {
        let config = config("reelnotes-session-secret");
        let token = generate_access_token(8, "user", &config).unwrap();
        assert!(!validate_token(&token, &config).unwrap().is_admin());
    }

    #[test]
    fn lapsed_session_is_rejected() {
        let config = config("reelnotes-session-secret");
        // Past the default 60 second leeway.
        let claims = Claims::issue(1, "user", -600);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_deployment_is_rejected() {
        let token = generate_access_token(1, "user", &config("first-deployment")).unwrap();
        assert!(validate_token(&token, &config("second-deployment")).is_err());
        assert!(validate_token("not.a.jwt", &config("first-deployment")).is_err());
    }

    #[test]
    fn session_lifetime_defaults_to_one_day() {
        let config = JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "s")]));
        assert_eq!(config.expires_in_secs(), 86_400);

        let config = JwtConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("JWT_ACCESS_EXPIRY_MINS", "90"),
        ]));
        assert_eq!(config.access_token_expiry_mins, 90);
    }

    #[test]
    #[should_panic(expected = "JWT_SECRET")]
    fn empty_secret_aborts() {
        JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "")]));
    }
}
