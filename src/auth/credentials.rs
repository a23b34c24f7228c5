//! Email/password verification

use super::database::AccountStore;
use super::error::AuthError;
use super::models::AccountClaims;
use super::password::{verify_decoy, verify_password};

/// Check `password` against the account stored under `email`.
///
/// Every rejection is `InvalidCredentials`; the reason is only logged.
/// Reads the store, never writes it.
pub fn verify(
    store: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Result<AccountClaims, AuthError> {
    if email.is_empty() || password.is_empty() {
        log::debug!("Login rejected: missing email or password");
        return Err(AuthError::InvalidCredentials);
    }

    let account = match store.find_by_email(email)? {
        Some(account) => account,
        None => {
            verify_decoy(password);
            log::debug!("Login rejected: no account for {}", email);
            return Err(AuthError::InvalidCredentials);
        }
    };

    let Some(hash) = account.password_hash.as_deref() else {
        verify_decoy(password);
        log::debug!("Login rejected: account {} has no password", account.id);
        return Err(AuthError::InvalidCredentials);
    };

    match verify_password(password, hash) {
        Ok(true) => {
            log::info!("✅ Login for {} ({})", account.email, account.role);
            Ok(account.claims())
        }
        Ok(false) => {
            log::debug!("Login rejected: wrong password for {}", account.id);
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => {
            log::error!("Stored hash for account {} is unusable: {}", account.id, e);
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::database::{tests::sample_account, AuthDatabase};
    use crate::auth::models::Role;
    use crate::auth::password::hash_password;
    use assert_matches::assert_matches;

    fn store_with(email: &str, password: &str, role: Role) -> AuthDatabase {
        let db = AuthDatabase::in_memory().unwrap();
        let mut account = sample_account("acc_1", email, role);
        account.password_hash = Some(hash_password(password).unwrap());
        db.create_account(&account).unwrap();
        db
    }

    #[test]
    fn test_correct_password_returns_claims() {
        let db = store_with("a@x.com", "correct", Role::Admin);

        let claims = verify(&db, "a@x.com", "correct").unwrap();
        assert_eq!(claims.id, "acc_1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_wrong_password_and_unknown_email_look_the_same() {
        let db = store_with("a@x.com", "correct", Role::User);

        let wrong = verify(&db, "a@x.com", "wrong").unwrap_err();
        let unknown = verify(&db, "nonexistent@x", "anything").unwrap_err();

        assert_eq!(wrong, unknown);
        assert_eq!(wrong.public_message(), unknown.public_message());
        assert_eq!(wrong.status(), unknown.status());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let db = store_with("a@x.com", "correct", Role::User);
        assert_matches!(verify(&db, "", "correct"), Err(AuthError::InvalidCredentials));
        assert_matches!(verify(&db, "a@x.com", ""), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_missing_or_corrupt_hash_is_a_rejection() {
        let db = AuthDatabase::in_memory().unwrap();
        let mut no_hash = sample_account("acc_1", "nohash@x.com", Role::User);
        no_hash.password_hash = None;
        db.create_account(&no_hash).unwrap();

        let mut corrupt = sample_account("acc_2", "corrupt@x.com", Role::User);
        corrupt.password_hash = Some("plaintext".to_string());
        db.create_account(&corrupt).unwrap();

        assert_matches!(
            verify(&db, "nohash@x.com", "anything"),
            Err(AuthError::InvalidCredentials)
        );
        assert_matches!(
            verify(&db, "corrupt@x.com", "plaintext"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_verification_does_not_touch_the_account() {
        let db = store_with("a@x.com", "correct", Role::User);
        let before = db.find_by_id("acc_1").unwrap().unwrap();

        let _ = verify(&db, "a@x.com", "wrong");
        let _ = verify(&db, "a@x.com", "correct");

        let after = db.find_by_id("acc_1").unwrap().unwrap();
        assert_eq!(before.updated_at, after.updated_at);
        assert_eq!(before.password_hash, after.password_hash);
    }
}
