use crate::db::models::Image;
use crate::db::{from_rows, Database, DbError, SqlParam};

pub(crate) struct NewImage<'a> {
    pub(crate) image_path: &'a str,
    pub(crate) position: &'a str,
    pub(crate) size: &'a str,
    pub(crate) caption: Option<&'a str>,
    pub(crate) display_order: i64,
}

pub(crate) async fn list_by_lesson(db: &Database, lesson_id: i64) -> Result<Vec<Image>, DbError> {
    let rows = db
        .all(
            "SELECT * FROM images WHERE lesson_id = ? ORDER BY display_order ASC, id ASC",
            vec![lesson_id.into()],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn insert(
    db: &Database,
    lesson_id: i64,
    image: NewImage<'_>,
    created_at: &str,
) -> Result<(), DbError> {
    db.run(
        "INSERT INTO images (lesson_id, image_path, position, size, caption, display_order, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            lesson_id.into(),
            image.image_path.into(),
            image.position.into(),
            image.size.into(),
            SqlParam::from(image.caption),
            image.display_order.into(),
            created_at.into(),
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_lesson(db: &Database, lesson_id: i64) -> Result<u64, DbError> {
    let result = db.run("DELETE FROM images WHERE lesson_id = ?", vec![lesson_id.into()]).await?;
    Ok(result.rows_affected)
}
