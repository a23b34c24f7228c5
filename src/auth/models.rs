//! Authentication data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// Persisted and carried in session tokens as its uppercase name. Anything
/// that is not one of the known names deserializes to `Unrecognized`, which
/// ranks below every known role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Editor,
    User,
    #[serde(other)]
    Unrecognized,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::User => "USER",
            Role::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Parse a stored role name. Never fails: unknown names map to
    /// `Unrecognized` so they can't satisfy a role requirement.
    pub fn parse(s: &str) -> Self {
        match s {
            "ADMIN" => Role::Admin,
            "EDITOR" => Role::Editor,
            "USER" => Role::User,
            other => {
                log::warn!("Unrecognized role '{}', treating as least privileged", other);
                Role::Unrecognized
            }
        }
    }

    /// Privilege rank used by the authorization gate.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Role::Unrecognized => 0,
            Role::User => 1,
            Role::Editor => 2,
            Role::Admin => 3,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unrecognized)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Account {
    pub fn claims(&self) -> AccountClaims {
        AccountClaims {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            image: self.image.clone(),
        }
    }
}

/// Identity claims carried from a verified login into a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub image: Option<String>,
}

/// Session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // account id
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub image: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(claims: AccountClaims, iat: i64, exp: i64) -> Self {
        Self {
            sub: claims.id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            image: claims.image,
            iat,
            exp,
        }
    }

    pub fn account_claims(&self) -> AccountClaims {
        AccountClaims {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            image: self.image.clone(),
        }
    }
}

/// Per-request view of the signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub image: Option<String>,
}

impl From<AccountClaims> for CurrentUser {
    fn from(claims: AccountClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            image: claims.image,
        }
    }
}

impl CurrentUser {
    pub fn claims(&self) -> AccountClaims {
        AccountClaims {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            image: self.image.clone(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// API request/response types
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: CurrentUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub token: String,
    pub user: Account,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"EDITOR\"").unwrap();
        assert_eq!(role, Role::Editor);
    }

    #[test]
    fn test_unknown_role_is_least_privileged() {
        let role: Role = serde_json::from_str("\"SUPERUSER\"").unwrap();
        assert_eq!(role, Role::Unrecognized);
        assert!(role.rank() < Role::User.rank());
        assert_eq!(Role::parse("admin"), Role::Unrecognized);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
    }

    #[test]
    fn test_account_never_serializes_password_hash() {
        let account = Account {
            id: "acc_1".to_string(),
            email: "a@x.com".to_string(),
            name: Some("Ana".to_string()),
            password_hash: Some("$argon2id$secret".to_string()),
            role: Role::User,
            image: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_session_claims_carry_account_claims() {
        let claims = AccountClaims {
            id: "acc_1".to_string(),
            email: "a@x.com".to_string(),
            name: None,
            role: Role::Admin,
            image: Some("https://cdn.example.com/avatar.png".to_string()),
        };

        let session = SessionClaims::new(claims.clone(), 10, 20);
        assert_eq!(session.sub, "acc_1");
        assert_eq!(session.account_claims(), claims);
    }
}
