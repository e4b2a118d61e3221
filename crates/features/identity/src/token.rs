use crate::error::IdentityError;
use cmt_domain::config::JwtConfig;
use cmt_domain::model::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// Full record id of the account ("user:...").
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub(crate) struct TokenService {
    encoding: EncodingKey,
    validation: Validation,
    issuer: String,
    audience: Option<String>,
    ttl_seconds: u64,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub(crate) fn new(config: &JwtConfig) -> Result<Self, IdentityError> {
        if config.secret.is_empty() {
            return Err(IdentityError::Config {
                message: "JWT secret must not be empty".into(),
                context: None,
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.clock_skew_seconds;
        validation.set_issuer(&[&config.issuer]);
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    pub(crate) fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
    ) -> Result<String, IdentityError> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_owned(),
            email: email.to_owned(),
            role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + self.ttl_seconds.cast_signed(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            IdentityError::Internal {
                message: e.to_string().into(),
                context: Some("Failed to sign token".into()),
            }
        })
    }

    pub(crate) fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| IdentityError::InvalidCredentials {
                message: e.to_string().into(),
                context: Some("Token verification failed".into()),
            })
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_owned(),
            issuer: "cmt".to_owned(),
            audience: None,
            ttl_seconds: 3600,
            clock_skew_seconds: 60,
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let service = TokenService::new(&config()).unwrap();
        let token = service.issue("user:abc", "a@b.c", Role::Chair).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.role, Role::Chair);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = TokenService::new(&config()).unwrap();
        let token = service.issue("user:abc", "a@b.c", Role::Author).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = TokenService::new(&config()).unwrap();

        let mut other_config = config();
        other_config.issuer = "someone-else".to_owned();
        let other = TokenService::new(&other_config).unwrap();

        let token = other.issue("user:abc", "a@b.c", Role::Author).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut bad = config();
        bad.secret = String::new();
        assert!(TokenService::new(&bad).is_err());
    }
}
