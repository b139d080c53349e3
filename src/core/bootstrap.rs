use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::now_rfc3339;
use crate::repositories;

/// Create the single admin account from `ADMIN_USERNAME`/`ADMIN_PASSWORD`
/// on first start. An existing row always wins.
pub(crate) async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    if repositories::admins::any_exists(state.db()).await? {
        tracing::info!("Admin account already exists");
        return Ok(());
    }

    let admin = state.settings().admin();
    if admin.password.is_empty() {
        tracing::warn!("ADMIN_PASSWORD not configured; skipping admin bootstrap");
        return Ok(());
    }

    let password_hash = security::hash_password(&admin.password)?;
    let created =
        repositories::admins::create(state.db(), &admin.username, &password_hash, &now_rfc3339())
            .await?;

    tracing::info!(username = %created.username, "Created default admin account");
    Ok(())
}
