//! Startup provisioning of the first administrator.

use carlton_core::auth::PasswordManager;
use carlton_core::store::{ContentStore, UserStore};
use carlton_core::user::validate::normalize_email;
use carlton_core::user::{Role, UserChanges, UserDraft};

use crate::config::BootstrapAdmin;
use crate::error::ApiError;

/// Create the configured admin account if it does not exist, or promote it
/// back to admin if it was demoted. An existing password is left alone.
pub async fn ensure_admin(
    store: &dyn ContentStore,
    admin: &BootstrapAdmin,
) -> Result<(), ApiError> {
    let email = normalize_email(&admin.email);

    if let Some(existing) = store.find_user_by_email(&email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(user_id = %existing.id, "bootstrap admin had lost its role, restoring");
            let changes = UserChanges {
                role: Some(Role::Admin),
                ..UserChanges::default()
            };
            store.update_user(existing.id, changes).await?;
        }
        return Ok(());
    }

    let draft = UserDraft {
        email,
        name: "Administrator".to_string(),
        role: Role::Admin,
        password_hash: PasswordManager::hash_password(&admin.password)?,
    };
    let user = store.insert_user(draft).await?;
    tracing::info!(user_id = %user.id, "bootstrap admin created");
    Ok(())
}
