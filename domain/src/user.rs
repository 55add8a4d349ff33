use crate::{global_role::GlobalRole, users};

pub use entity_api::user::{
    find_by_email, find_by_id, find_by_username, AuthSession, Backend, Credentials,
};

pub fn is_admin(user: &users::Model) -> bool {
    user.global_role == GlobalRole::Admin
}

/// Users holding at least one approved membership, plus admins.
pub fn is_approved(user: &users::Model) -> bool {
    matches!(user.global_role, GlobalRole::Member | GlobalRole::Admin)
}
