//! Administrative account seeding

use super::{
    database::{AccountStore, AuthDatabase},
    error::AuthError,
    models::{Account, Role},
    password::{hash_password, validate_password},
};
use crate::content::looks_like_email;

/// What [`seed_admin`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(String),
    Promoted(String),
    AlreadyAdmin(String),
}

/// Create an ADMIN account, or promote the existing account with this email.
///
/// An existing account keeps its password.
pub fn seed_admin(
    db: &AuthDatabase,
    email: &str,
    name: &str,
    password: &str,
) -> Result<SeedOutcome, AuthError> {
    let email = email.trim();
    if !looks_like_email(email) {
        return Err(AuthError::Validation("Invalid email format".to_string()));
    }

    if let Some(existing) = db.find_by_email(email)? {
        if existing.role == Role::Admin {
            return Ok(SeedOutcome::AlreadyAdmin(existing.id));
        }
        db.set_role(&existing.id, Role::Admin)?;
        log::info!("⬆️ Account {} promoted to ADMIN", existing.id);
        return Ok(SeedOutcome::Promoted(existing.id));
    }

    validate_password(password).map_err(|e| AuthError::Validation(e.to_string()))?;
    let password_hash = hash_password(password)
        .map_err(|e| AuthError::Storage(format!("password hashing failed: {}", e)))?;

    let now = chrono::Utc::now().to_rfc3339();
    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        password_hash: Some(password_hash),
        role: Role::Admin,
        image: None,
        created_at: now.clone(),
        updated_at: now,
    };
    db.create_account(&account)?;
    log::info!("👑 Admin account {} created", account.id);

    Ok(SeedOutcome::Created(account.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials;
    use assert_matches::assert_matches;

    #[test]
    fn test_seed_creates_admin_that_can_sign_in() {
        let db = AuthDatabase::in_memory().unwrap();

        let outcome = seed_admin(&db, "admin@x.com", "Admin", "Portfolio2024").unwrap();
        assert_matches!(outcome, SeedOutcome::Created(_));

        let claims = credentials::verify(&db, "admin@x.com", "Portfolio2024").unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_seed_is_idempotent_and_keeps_password() {
        let db = AuthDatabase::in_memory().unwrap();
        seed_admin(&db, "admin@x.com", "Admin", "Portfolio2024").unwrap();

        let again = seed_admin(&db, "admin@x.com", "Admin", "Different2025").unwrap();
        assert_matches!(again, SeedOutcome::AlreadyAdmin(_));

        assert!(credentials::verify(&db, "admin@x.com", "Portfolio2024").is_ok());
        assert_matches!(
            credentials::verify(&db, "admin@x.com", "Different2025"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_seed_promotes_existing_user() {
        let db = AuthDatabase::in_memory().unwrap();
        let user = crate::auth::database::tests::sample_account("u1", "ana@x.com", Role::User);
        db.create_account(&user).unwrap();

        let outcome = seed_admin(&db, "ana@x.com", "", "ignored").unwrap();
        assert_eq!(outcome, SeedOutcome::Promoted("u1".to_string()));
        assert_eq!(db.find_by_id("u1").unwrap().unwrap().role, Role::Admin);
    }

    #[test]
    fn test_seed_rejects_weak_password_for_new_account() {
        let db = AuthDatabase::in_memory().unwrap();
        assert_matches!(
            seed_admin(&db, "admin@x.com", "Admin", "short"),
            Err(AuthError::Validation(_))
        );
    }
}
