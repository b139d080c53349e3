use crate::db::models::{Lesson, LessonSummary, LessonWithContext};
use crate::db::{from_row, from_rows, Database, DbError, SqlParam};

pub(crate) async fn list_summaries_by_unit(
    db: &Database,
    unit_id: i64,
) -> Result<Vec<LessonSummary>, DbError> {
    let rows = db
        .all(
            "SELECT id, unit_id, title, created_at FROM lessons
             WHERE unit_id = ? ORDER BY created_at ASC, id ASC",
            vec![unit_id.into()],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn find_by_id(db: &Database, id: i64) -> Result<Option<Lesson>, DbError> {
    db.get("SELECT * FROM lessons WHERE id = ?", vec![id.into()]).await?.map(from_row).transpose()
}

pub(crate) async fn list_with_context(db: &Database) -> Result<Vec<LessonWithContext>, DbError> {
    let rows = db
        .all(
            "SELECT l.id, l.unit_id, l.title, l.content, l.created_at,
                    u.title AS unit_title, c.name AS class_name
             FROM lessons l
             JOIN units u ON l.unit_id = u.id
             JOIN classes c ON u.class_id = c.id
             ORDER BY l.created_at DESC, l.id DESC",
            vec![],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn title_exists_in_unit(
    db: &Database,
    unit_id: i64,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<bool, DbError> {
    let row = match exclude_id {
        Some(id) => {
            db.get(
                "SELECT id FROM lessons WHERE unit_id = ? AND title = ? AND id != ?",
                vec![unit_id.into(), title.into(), SqlParam::Int(id)],
            )
            .await?
        }
        None => {
            db.get(
                "SELECT id FROM lessons WHERE unit_id = ? AND title = ?",
                vec![unit_id.into(), title.into()],
            )
            .await?
        }
    };
    Ok(row.is_some())
}

pub(crate) async fn create(
    db: &Database,
    unit_id: i64,
    title: &str,
    content: &str,
    created_at: &str,
) -> Result<Lesson, DbError> {
    let result = db
        .run(
            "INSERT INTO lessons (unit_id, title, content, created_at) VALUES (?, ?, ?, ?)",
            vec![unit_id.into(), title.into(), content.into(), created_at.into()],
        )
        .await?;

    let id = result.inserted_id.ok_or(sqlx::Error::RowNotFound)?;
    find_by_id(db, id).await?.ok_or_else(|| DbError::Sqlx(sqlx::Error::RowNotFound))
}

pub(crate) async fn update(
    db: &Database,
    id: i64,
    unit_id: i64,
    title: &str,
    content: &str,
) -> Result<u64, DbError> {
    let result = db
        .run(
            "UPDATE lessons SET title = ?, unit_id = ?, content = ? WHERE id = ?",
            vec![title.into(), unit_id.into(), content.into(), id.into()],
        )
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete(db: &Database, id: i64) -> Result<u64, DbError> {
    let result = db.run("DELETE FROM lessons WHERE id = ?", vec![id.into()]).await?;
    Ok(result.rows_affected)
}
