use crate::db::models::{Unit, UnitWithClass};
use crate::db::{from_row, from_rows, Database, DbError, SqlParam};

pub(crate) async fn list_by_class(db: &Database, class_id: i64) -> Result<Vec<Unit>, DbError> {
    let rows = db
        .all(
            "SELECT * FROM units WHERE class_id = ? ORDER BY created_at ASC, id ASC",
            vec![class_id.into()],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn find_by_id(db: &Database, id: i64) -> Result<Option<Unit>, DbError> {
    db.get("SELECT * FROM units WHERE id = ?", vec![id.into()]).await?.map(from_row).transpose()
}

pub(crate) async fn list_with_class(db: &Database) -> Result<Vec<UnitWithClass>, DbError> {
    let rows = db
        .all(
            "SELECT u.id, u.class_id, u.title, u.created_at, c.name AS class_name
             FROM units u
             JOIN classes c ON u.class_id = c.id
             ORDER BY u.created_at DESC, u.id DESC",
            vec![],
        )
        .await?;
    from_rows(rows)
}

/// Duplicate-title probe within a class, optionally excluding a unit
/// (used when updating that unit itself).
pub(crate) async fn title_exists_in_class(
    db: &Database,
    class_id: i64,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<bool, DbError> {
    let row = match exclude_id {
        Some(id) => {
            db.get(
                "SELECT id FROM units WHERE class_id = ? AND title = ? AND id != ?",
                vec![class_id.into(), title.into(), SqlParam::Int(id)],
            )
            .await?
        }
        None => {
            db.get(
                "SELECT id FROM units WHERE class_id = ? AND title = ?",
                vec![class_id.into(), title.into()],
            )
            .await?
        }
    };
    Ok(row.is_some())
}

pub(crate) async fn create(
    db: &Database,
    class_id: i64,
    title: &str,
    created_at: &str,
) -> Result<Unit, DbError> {
    let result = db
        .run(
            "INSERT INTO units (class_id, title, created_at) VALUES (?, ?, ?)",
            vec![class_id.into(), title.into(), created_at.into()],
        )
        .await?;

    let id = result.inserted_id.ok_or(sqlx::Error::RowNotFound)?;
    find_by_id(db, id).await?.ok_or_else(|| DbError::Sqlx(sqlx::Error::RowNotFound))
}

pub(crate) async fn update(
    db: &Database,
    id: i64,
    class_id: i64,
    title: &str,
) -> Result<u64, DbError> {
    let result = db
        .run(
            "UPDATE units SET title = ?, class_id = ? WHERE id = ?",
            vec![title.into(), class_id.into(), id.into()],
        )
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete(db: &Database, id: i64) -> Result<u64, DbError> {
    let result = db.run("DELETE FROM units WHERE id = ?", vec![id.into()]).await?;
    Ok(result.rows_affected)
}
