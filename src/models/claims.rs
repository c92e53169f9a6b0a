//! JWT claims of registration desk staff

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Staff role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Dashboards and exports
    Viewer,
    /// Viewer plus badge issuing
    Desk,
    Admin,
}

/// JWT Claims for authenticated staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: String,
    pub role: StaffRole,
    pub exp: i64,
    pub iat: i64,
}

impl StaffClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks
    pub fn require_read_registrations(&self) -> Result<(), AppError> {
        self.require(StaffRole::Viewer, "read registrations")
    }

    pub fn require_issue_badges(&self) -> Result<(), AppError> {
        self.require(StaffRole::Desk, "issue badges")
    }

    fn require(&self, minimum: StaffRole, action: &str) -> Result<(), AppError> {
        if self.role >= minimum {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Insufficient rights to {}", action)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(role: StaffRole) -> StaffClaims {
        let now = Utc::now();
        StaffClaims {
            sub: "desk@example.org".to_string(),
            role,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(StaffRole::Desk).create_token("secret").unwrap();
        let parsed = StaffClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.role, StaffRole::Desk);
        assert!(StaffClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_role_requirements() {
        let viewer = claims(StaffRole::Viewer);
        assert!(viewer.require_read_registrations().is_ok());
        assert!(matches!(
            viewer.require_issue_badges(),
            Err(AppError::Authorization(_))
        ));
        assert!(claims(StaffRole::Admin).require_issue_badges().is_ok());
    }
}
