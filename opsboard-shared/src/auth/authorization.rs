/// Authorization helpers and permission checks
///
/// # Permission Model
///
/// Access control is layered:
///
/// 1. **Team Membership**: the actor must belong to the team named by the
///    request's team context. Membership is the only grant; there are no
///    per-team roles. Superusers get no exemption here.
/// 2. **Item Access**: superusers may act on any item; everyone else must
///    both own the item and have it scoped to the resolved team.
///
/// # Example
///
/// ```no_run
/// use opsboard_shared::auth::authorization::{check_item_access, ItemAction};
/// use opsboard_shared::models::item::Item;
/// use opsboard_shared::models::team::Team;
/// use opsboard_shared::models::user::User;
///
/// fn can_delete(actor: &User, item: &Item, team: &Team) -> bool {
///     check_item_access(actor, item, team, ItemAction::Delete).is_ok()
/// }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::item::Item;
use crate::models::membership::Membership;
use crate::models::team::Team;
use crate::models::user::User;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the team
    #[error("Not a member of team {0}")]
    NotMember(Uuid),

    /// User cannot act on the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Actions that can be performed on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Read,
    Update,
    Delete,
}

/// Checks if a user is a member of a team
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if the user has no membership row for
/// the team. Superusers receive no special treatment: without a membership
/// they fail this check like anyone else.
pub async fn require_membership(
    pool: &PgPool,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let is_member = Membership::exists(pool, team_id, user_id).await?;

    if !is_member {
        return Err(AuthzError::NotMember(team_id));
    }

    Ok(())
}

/// Checks whether an actor may perform an action on an item
///
/// Pure policy decision over already-loaded rows. The rules are identical
/// for every `ItemAction`:
///
/// - Superusers may act on any item.
/// - Otherwise the actor must own the item AND the item must belong to the
///   team the request resolved. Both conditions failing or either one
///   failing yields the same error, so the response never reveals which
///   half was wrong.
///
/// # Errors
///
/// Returns `AuthzError::NotAuthorized` if the actor fails the check
pub fn check_item_access(
    actor: &User,
    item: &Item,
    team: &Team,
    _action: ItemAction,
) -> Result<(), AuthzError> {
    if actor.is_superuser {
        return Ok(());
    }

    if item.owner_id == actor.id && item.team_id == team.id {
        return Ok(());
    }

    Err(AuthzError::NotAuthorized)
}

/// Checks whether an actor may read or modify a team's own records
///
/// Superusers may manage any team. Regular users must be members.
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if a non-superuser has no membership
pub async fn check_team_access(
    pool: &PgPool,
    actor: &User,
    team_id: Uuid,
) -> Result<(), AuthzError> {
    if actor.is_superuser {
        return Ok(());
    }

    require_membership(pool, team_id, actor.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_user(is_superuser: bool) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            full_name: None,
            is_active: true,
            is_superuser,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_team() -> Team {
        let now = Utc::now();
        Team {
            id: Uuid::new_v4(),
            name: "engineering".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn make_item(owner_id: Uuid, team_id: Uuid) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::new_v4(),
            title: "Test item".to_string(),
            description: None,
            owner_id,
            team_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_in_team_can_access() {
        let actor = make_user(false);
        let team = make_team();
        let item = make_item(actor.id, team.id);

        for action in [ItemAction::Read, ItemAction::Update, ItemAction::Delete] {
            assert!(check_item_access(&actor, &item, &team, action).is_ok());
        }
    }

    #[test]
    fn test_non_owner_denied() {
        let actor = make_user(false);
        let team = make_team();
        let item = make_item(Uuid::new_v4(), team.id);

        let result = check_item_access(&actor, &item, &team, ItemAction::Read);
        assert!(matches!(result, Err(AuthzError::NotAuthorized)));
    }

    #[test]
    fn test_owner_wrong_team_denied() {
        let actor = make_user(false);
        let team = make_team();
        // Owned by the actor but scoped to some other team
        let item = make_item(actor.id, Uuid::new_v4());

        let result = check_item_access(&actor, &item, &team, ItemAction::Update);
        assert!(matches!(result, Err(AuthzError::NotAuthorized)));
    }

    #[test]
    fn test_superuser_can_access_anything() {
        let actor = make_user(true);
        let team = make_team();
        let item = make_item(Uuid::new_v4(), Uuid::new_v4());

        for action in [ItemAction::Read, ItemAction::Update, ItemAction::Delete] {
            assert!(check_item_access(&actor, &item, &team, action).is_ok());
        }
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::NotAuthorized;
        assert!(err.to_string().contains("Not authorized"));
    }
}
