//! Bearer token verification.
//!
//! Tokens are minted by the identity service; this crate only verifies
//! the HS256 signature and reads the claims it needs to build a
//! [`Viewer`].

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::{Role, Viewer};
use serde::Deserialize;
use uuid::Uuid;

use crate::App;

#[derive(Debug, Deserialize)]
pub struct LoginClaims {
    pub sub: Uuid,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
    pub exp: i64,
}

impl LoginClaims {
    pub fn decode(app: &App, token: &str) -> Result<Self> {
        let key = DecodingKey::from_secret(app.config.auth.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        jsonwebtoken::decode::<Self>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|error| {
                ApiError::from_report(ErrorCategory::Unauthorized, error_stack::Report::new(error))
                    .message("Invalid bearer token")
            })
    }

    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.sub.into(),
            role: self.role,
            verified: self.verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoginClaims;
    use crate::test_utils;

    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use palaver_model::Role;
    use serde::Serialize;
    use uuid::Uuid;

    #[derive(Serialize)]
    struct TestClaims {
        sub: Uuid,
        role: Role,
        verified: bool,
        exp: i64,
    }

    fn mint(secret: &[u8], claims: &TestClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn valid_tokens_become_viewers() {
        let (app, _) = test_utils::build_test_app();
        let sub = Uuid::new_v4();
        let token = mint(
            app.config.auth.jwt_secret.as_bytes(),
            &TestClaims {
                sub,
                role: Role::Admin,
                verified: true,
                exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            },
        );

        let viewer = LoginClaims::decode(&app, &token).unwrap().viewer();
        assert_eq!(viewer.id.0, sub);
        assert!(viewer.is_admin());
        assert!(viewer.verified);
    }

    #[test]
    fn foreign_signatures_are_rejected() {
        let (app, _) = test_utils::build_test_app();
        let token = mint(
            b"not-the-configured-secret",
            &TestClaims {
                sub: Uuid::new_v4(),
                role: Role::User,
                verified: true,
                exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            },
        );

        let error = LoginClaims::decode(&app, &token).unwrap_err();
        assert_eq!(
            error.category(),
            palaver_error::ErrorCategory::Unauthorized
        );
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let (app, _) = test_utils::build_test_app();
        let token = mint(
            app.config.auth.jwt_secret.as_bytes(),
            &TestClaims {
                sub: Uuid::new_v4(),
                role: Role::User,
                verified: true,
                exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp(),
            },
        );

        assert!(LoginClaims::decode(&app, &token).is_err());
    }
}
