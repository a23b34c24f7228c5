//! Role-based authorization gate
//!
//! Every protected page and mutating endpoint calls [`authorize`] before it
//! touches privileged data. The decision keeps "not signed in" and "signed in
//! but not allowed" apart so callers can answer each differently.

use std::fmt;

use super::error::AuthError;
use super::models::{CurrentUser, Role};

/// What a protected operation demands of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in account, whatever its role
    Authenticated,
    /// A known role ranked at least this high
    Role(Role),
}

impl Requirement {
    pub const ADMIN: Requirement = Requirement::Role(Role::Admin);

    fn is_met_by(&self, role: Role) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Role(required) => {
                role.is_known() && required.is_known() && role.rank() >= required.rank()
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Authenticated => f.write_str("any authenticated user"),
            Requirement::Role(role) => write!(f, "{}", role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    AuthenticatedInsufficientRole,
    AuthenticatedAuthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    InsufficientRole { role: Role, required: Requirement },
}

impl From<DenyReason> for AuthError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AuthError::Unauthenticated,
            DenyReason::InsufficientRole { role, required } => AuthError::InsufficientRole {
                role,
                required: required.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<'a> {
    Allow(&'a CurrentUser),
    Deny(DenyReason),
}

pub fn classify(user: Option<&CurrentUser>, required: Requirement) -> GateState {
    match user {
        None => GateState::Unauthenticated,
        Some(user) if required.is_met_by(user.role) => GateState::AuthenticatedAuthorized,
        Some(_) => GateState::AuthenticatedInsufficientRole,
    }
}

pub fn authorize(user: Option<&CurrentUser>, required: Requirement) -> Decision<'_> {
    match (classify(user, required), user) {
        (GateState::AuthenticatedAuthorized, Some(user)) => Decision::Allow(user),
        (GateState::AuthenticatedInsufficientRole, Some(user)) => {
            log::warn!(
                "🚫 Account {} ({}) denied: requires {}",
                user.id,
                user.role,
                required
            );
            Decision::Deny(DenyReason::InsufficientRole {
                role: user.role,
                required,
            })
        }
        _ => {
            log::debug!("Anonymous request denied: requires {}", required);
            Decision::Deny(DenyReason::Unauthenticated)
        }
    }
}

/// [`authorize`] as a `Result`, for handlers that propagate with `?`.
pub fn require(user: Option<&CurrentUser>, required: Requirement) -> Result<&CurrentUser, AuthError> {
    match authorize(user, required) {
        Decision::Allow(user) => Ok(user),
        Decision::Deny(reason) => Err(reason.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: "acc_1".to_string(),
            email: "a@x.com".to_string(),
            name: None,
            role,
            image: None,
        }
    }

    #[test]
    fn test_user_cannot_reach_admin() {
        let u = user(Role::User);
        assert_eq!(
            authorize(Some(&u), Requirement::ADMIN),
            Decision::Deny(DenyReason::InsufficientRole {
                role: Role::User,
                required: Requirement::ADMIN,
            })
        );
        assert_matches!(
            require(Some(&u), Requirement::ADMIN),
            Err(AuthError::InsufficientRole { .. })
        );
    }

    #[test]
    fn test_admin_satisfies_admin_and_user() {
        let admin = user(Role::Admin);
        assert_matches!(authorize(Some(&admin), Requirement::ADMIN), Decision::Allow(_));
        assert_matches!(
            authorize(Some(&admin), Requirement::Role(Role::User)),
            Decision::Allow(_)
        );
        assert_matches!(
            authorize(Some(&admin), Requirement::Authenticated),
            Decision::Allow(_)
        );
    }

    #[test]
    fn test_role_ordering() {
        let editor = user(Role::Editor);
        assert_eq!(
            classify(Some(&editor), Requirement::Role(Role::User)),
            GateState::AuthenticatedAuthorized
        );
        assert_eq!(
            classify(Some(&editor), Requirement::ADMIN),
            GateState::AuthenticatedInsufficientRole
        );
    }

    #[test]
    fn test_anonymous_is_distinct_from_forbidden() {
        assert_eq!(classify(None, Requirement::Authenticated), GateState::Unauthenticated);
        assert_eq!(
            authorize(None, Requirement::ADMIN),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_matches!(
            require(None, Requirement::ADMIN),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn test_unrecognized_role_only_passes_authenticated() {
        let odd = user(Role::Unrecognized);
        for role in [Role::User, Role::Editor, Role::Admin, Role::Unrecognized] {
            assert_eq!(
                classify(Some(&odd), Requirement::Role(role)),
                GateState::AuthenticatedInsufficientRole,
                "required {}",
                role
            );
        }
        assert_eq!(
            classify(Some(&odd), Requirement::Authenticated),
            GateState::AuthenticatedAuthorized
        );
    }

    #[test]
    fn test_requiring_unrecognized_never_allows() {
        let admin = user(Role::Admin);
        assert_eq!(
            classify(Some(&admin), Requirement::Role(Role::Unrecognized)),
            GateState::AuthenticatedInsufficientRole
        );
    }
}
