use super::config::JwtConfig;
use super::roles::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id (hex ObjectId)
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl JwtClaims {
    pub fn has_role(&self, role: Role) -> bool {
        let wanted = role.as_ref();
        self.roles.iter().any(|r| r == wanted)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// A freshly signed token plus its lifetime, as returned by login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Stateless HS256 token issuer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    inner: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;

        Self {
            inner: Arc::new(Keys {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
                validation,
                ttl_secs: config.access_ttl_secs,
            }),
        }
    }

    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        roles: &[Role],
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: (now + Duration::seconds(self.inner.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding)?;
        Ok(IssuedToken {
            token,
            expires_in: self.inner.ttl_secs,
        })
    }

    /// Check signature and expiry and return the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.inner.decoding, &self.inner.validation)?;
        Ok(data.claims)
    }
}
