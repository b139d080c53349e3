use crate::db::models::Video;
use crate::db::{from_rows, Database, DbError, SqlParam};

pub(crate) struct NewVideo<'a> {
    pub(crate) video_url: &'a str,
    pub(crate) position: &'a str,
    pub(crate) size: &'a str,
    pub(crate) explanation: Option<&'a str>,
    pub(crate) display_order: i64,
}

pub(crate) async fn list_by_lesson(db: &Database, lesson_id: i64) -> Result<Vec<Video>, DbError> {
    let rows = db
        .all(
            "SELECT * FROM videos WHERE lesson_id = ? ORDER BY display_order ASC, id ASC",
            vec![lesson_id.into()],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn insert(
    db: &Database,
    lesson_id: i64,
    video: NewVideo<'_>,
    created_at: &str,
) -> Result<(), DbError> {
    db.run(
        "INSERT INTO videos (lesson_id, video_url, position, size, explanation, display_order, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            lesson_id.into(),
            video.video_url.into(),
            video.position.into(),
            video.size.into(),
            SqlParam::from(video.explanation),
            video.display_order.into(),
            created_at.into(),
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_lesson(db: &Database, lesson_id: i64) -> Result<u64, DbError> {
    let result = db.run("DELETE FROM videos WHERE lesson_id = ?", vec![lesson_id.into()]).await?;
    Ok(result.rows_affected)
}
