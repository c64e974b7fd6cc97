//! Role and ownership checks for club operations.

use uuid::Uuid;

use crate::models::UserRole;

/// Members and admins may organize events, upload routes and register.
pub fn can_participate(role: UserRole) -> bool {
    role.is_member()
}

/// The organizer or any admin may edit or delete an event.
pub fn can_manage_event(caller_id: Uuid, caller_role: UserRole, organizer_id: Uuid) -> bool {
    caller_role.is_admin() || caller_id == organizer_id
}
