use crate::db::models::Class;
use crate::db::{from_row, from_rows, Database, DbError};

pub(crate) async fn list_all(db: &Database) -> Result<Vec<Class>, DbError> {
    let rows = db.all("SELECT * FROM classes ORDER BY created_at DESC, id DESC", vec![]).await?;
    from_rows(rows)
}

pub(crate) async fn find_by_id(db: &Database, id: i64) -> Result<Option<Class>, DbError> {
    db.get("SELECT * FROM classes WHERE id = ?", vec![id.into()]).await?.map(from_row).transpose()
}

pub(crate) async fn create(db: &Database, name: &str, created_at: &str) -> Result<Class, DbError> {
    let result = db
        .run(
            "INSERT INTO classes (name, created_at) VALUES (?, ?)",
            vec![name.into(), created_at.into()],
        )
        .await?;

    let id = result.inserted_id.ok_or(sqlx::Error::RowNotFound)?;
    find_by_id(db, id).await?.ok_or_else(|| DbError::Sqlx(sqlx::Error::RowNotFound))
}

pub(crate) async fn update(db: &Database, id: i64, name: &str) -> Result<u64, DbError> {
    let result = db
        .run("UPDATE classes SET name = ? WHERE id = ?", vec![name.into(), id.into()])
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete(db: &Database, id: i64) -> Result<u64, DbError> {
    let result = db.run("DELETE FROM classes WHERE id = ?", vec![id.into()]).await?;
    Ok(result.rows_affected)
}
