use crate::db::models::Question;
use crate::db::{from_row, from_rows, Database, DbError};

pub(crate) struct QuestionFields<'a> {
    pub(crate) question_text: &'a str,
    pub(crate) option_a: &'a str,
    pub(crate) option_b: &'a str,
    pub(crate) option_c: &'a str,
    pub(crate) option_d: &'a str,
    pub(crate) correct_answer: &'a str,
    pub(crate) display_order: i64,
}

pub(crate) async fn list_by_lesson(
    db: &Database,
    lesson_id: i64,
) -> Result<Vec<Question>, DbError> {
    let rows = db
        .all(
            "SELECT * FROM questions WHERE lesson_id = ? ORDER BY display_order ASC, id ASC",
            vec![lesson_id.into()],
        )
        .await?;
    from_rows(rows)
}

pub(crate) async fn find_for_lesson(
    db: &Database,
    lesson_id: i64,
    question_id: i64,
) -> Result<Option<Question>, DbError> {
    db.get(
        "SELECT * FROM questions WHERE id = ? AND lesson_id = ?",
        vec![question_id.into(), lesson_id.into()],
    )
    .await?
    .map(from_row)
    .transpose()
}

pub(crate) async fn create(
    db: &Database,
    lesson_id: i64,
    fields: QuestionFields<'_>,
    created_at: &str,
) -> Result<Question, DbError> {
    let result = db
        .run(
            "INSERT INTO questions (lesson_id, question_text, option_a, option_b, option_c, option_d,
                                    correct_answer, display_order, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                lesson_id.into(),
                fields.question_text.into(),
                fields.option_a.into(),
                fields.option_b.into(),
                fields.option_c.into(),
                fields.option_d.into(),
                fields.correct_answer.into(),
                fields.display_order.into(),
                created_at.into(),
            ],
        )
        .await?;

    let id = result.inserted_id.ok_or(sqlx::Error::RowNotFound)?;
    find_for_lesson(db, lesson_id, id)
        .await?
        .ok_or_else(|| DbError::Sqlx(sqlx::Error::RowNotFound))
}

pub(crate) async fn update_for_lesson(
    db: &Database,
    lesson_id: i64,
    question_id: i64,
    fields: QuestionFields<'_>,
) -> Result<u64, DbError> {
    let result = db
        .run(
            "UPDATE questions SET question_text = ?, option_a = ?, option_b = ?, option_c = ?,
                                  option_d = ?, correct_answer = ?, display_order = ?
             WHERE id = ? AND lesson_id = ?",
            vec![
                fields.question_text.into(),
                fields.option_a.into(),
                fields.option_b.into(),
                fields.option_c.into(),
                fields.option_d.into(),
                fields.correct_answer.into(),
                fields.display_order.into(),
                question_id.into(),
                lesson_id.into(),
            ],
        )
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete_for_lesson(
    db: &Database,
    lesson_id: i64,
    question_id: i64,
) -> Result<u64, DbError> {
    let result = db
        .run(
            "DELETE FROM questions WHERE id = ? AND lesson_id = ?",
            vec![question_id.into(), lesson_id.into()],
        )
        .await?;
    Ok(result.rows_affected)
}
