use crate::db::models::Admin;
use crate::db::{from_row, Database, DbError};

pub(crate) async fn find_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<Admin>, DbError> {
    db.get("SELECT * FROM admins WHERE username = ?", vec![username.into()])
        .await?
        .map(from_row)
        .transpose()
}

pub(crate) async fn find_by_id(db: &Database, id: i64) -> Result<Option<Admin>, DbError> {
    db.get("SELECT * FROM admins WHERE id = ?", vec![id.into()]).await?.map(from_row).transpose()
}

pub(crate) async fn any_exists(db: &Database) -> Result<bool, DbError> {
    let row = db.get("SELECT id FROM admins LIMIT 1", vec![]).await?;
    Ok(row.is_some())
}

pub(crate) async fn create(
    db: &Database,
    username: &str,
    password_hash: &str,
    created_at: &str,
) -> Result<Admin, DbError> {
    let result = db
        .run(
            "INSERT INTO admins (username, password_hash, created_at) VALUES (?, ?, ?)",
            vec![username.into(), password_hash.into(), created_at.into()],
        )
        .await?;

    let id = result.inserted_id.ok_or(sqlx::Error::RowNotFound)?;
    db.get("SELECT * FROM admins WHERE id = ?", vec![id.into()])
        .await?
        .map(from_row)
        .transpose()?
        .ok_or_else(|| DbError::Sqlx(sqlx::Error::RowNotFound))
}
