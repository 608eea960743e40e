//! The owner-or-admin access rule shared by every user-scoped resource.
//!
//! Callers must load the target row before invoking these checks so that a
//! missing row surfaces as NotFound rather than Forbidden.

use crate::db::models::user_models::User;
use crate::error::Error;
use uuid::Uuid;

/// Allow only admins; fails closed with an authorization error.
pub fn require_admin(caller: &User) -> Result<(), Error> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(Error::Authorization(
            "Administrator privileges required".to_string(),
        ))
    }
}

/// Allow admins or the user who owns the resource.
pub fn require_owner_or_admin(caller: &User, owner_id: &Uuid) -> Result<(), Error> {
    if caller.is_admin || caller.id == *owner_id {
        Ok(())
    } else {
        Err(Error::Authorization(
            "Not authorized to access this resource".to_string(),
        ))
    }
}

/// Resolve the user filter for a list query.
///
/// Non-admin callers are always narrowed to their own rows; any requested
/// filter is ignored. Admins see everything unless they ask for a filter.
pub fn scope_user_filter(caller: &User, requested: Option<Uuid>) -> Option<Uuid> {
    if caller.is_admin {
        requested
    } else {
        Some(caller.id)
    }
}

/// Resolve an optionally loaded row under the owner-or-admin rule.
///
/// A missing row answers NotFound before any authorization check runs,
/// so probing ids never reveals whether a row belongs to someone else.
pub fn authorize_owned<T>(
    row: Option<T>,
    caller: &User,
    owner_id: fn(&T) -> Uuid,
    resource: &str,
    id: &Uuid,
) -> Result<T, Error> {
    let row = row.ok_or_else(|| Error::NotFound(format!("{} not found: {}", resource, id)))?;
    require_owner_or_admin(caller, &owner_id(&row))?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "dancer@codance.com".to_string(),
            username: "dancer".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_passes_both_checks() {
        let admin = user(true);
        let other = Uuid::new_v4();
        assert!(require_admin(&admin).is_ok());
        assert!(require_owner_or_admin(&admin, &other).is_ok());
    }

    #[test]
    fn owner_passes_ownership_but_not_admin() {
        let caller = user(false);
        let own_id = caller.id;
        assert!(require_owner_or_admin(&caller, &own_id).is_ok());
        assert!(require_admin(&caller).is_err());
    }

    #[test]
    fn non_owner_is_denied() {
        let caller = user(false);
        let result = require_owner_or_admin(&caller, &Uuid::new_v4());
        assert!(matches!(result, Err(Error::Authorization(_))));
    }

    #[test]
    fn non_admin_filter_is_always_own_id() {
        let caller = user(false);
        // The requested filter is ignored for non-admins
        assert_eq!(
            scope_user_filter(&caller, Some(Uuid::new_v4())),
            Some(caller.id)
        );
        assert_eq!(scope_user_filter(&caller, None), Some(caller.id));
    }

    #[test]
    fn admin_filter_is_honored() {
        let admin = user(true);
        let target = Uuid::new_v4();
        assert_eq!(scope_user_filter(&admin, Some(target)), Some(target));
        assert_eq!(scope_user_filter(&admin, None), None);
    }

    struct Row {
        owner: Uuid,
    }

    #[test]
    fn missing_row_answers_not_found_before_authorization() {
        let caller = user(false);
        let id = Uuid::new_v4();
        // A caller who could never access the row still sees NotFound
        let result = authorize_owned::<Row>(None, &caller, |r| r.owner, "Row", &id);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn foreign_row_is_forbidden_only_once_it_exists() {
        let caller = user(false);
        let id = Uuid::new_v4();
        let row = Row {
            owner: Uuid::new_v4(),
        };
        let result = authorize_owned(Some(row), &caller, |r| r.owner, "Row", &id);
        assert!(matches!(result, Err(Error::Authorization(_))));
    }

    #[test]
    fn owner_gets_the_row_back() {
        let caller = user(false);
        let id = Uuid::new_v4();
        let row = Row { owner: caller.id };
        let resolved = authorize_owned(Some(row), &caller, |r| r.owner, "Row", &id).unwrap();
        assert_eq!(resolved.owner, caller.id);
    }
}
