use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Admin {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Class {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Unit {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) created_at: String,
}

/// Unit joined with its parent class name, for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UnitWithClass {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) created_at: String,
    pub(crate) class_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Lesson {
    pub(crate) id: i64,
    pub(crate) unit_id: i64,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) created_at: String,
}

/// Public per-unit listing row; lesson bodies stay out of the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LessonSummary {
    pub(crate) id: i64,
    pub(crate) unit_id: i64,
    pub(crate) title: String,
    pub(crate) created_at: String,
}

/// Lesson joined with unit title and class name, for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LessonWithContext {
    pub(crate) id: i64,
    pub(crate) unit_id: i64,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) created_at: String,
    pub(crate) unit_title: String,
    pub(crate) class_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Video {
    pub(crate) id: i64,
    pub(crate) lesson_id: i64,
    pub(crate) video_url: String,
    pub(crate) position: String,
    pub(crate) size: String,
    pub(crate) explanation: Option<String>,
    pub(crate) display_order: i64,
    pub(crate) created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Image {
    pub(crate) id: i64,
    pub(crate) lesson_id: i64,
    pub(crate) image_path: String,
    pub(crate) position: String,
    pub(crate) size: String,
    pub(crate) caption: Option<String>,
    pub(crate) display_order: i64,
    pub(crate) created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) lesson_id: i64,
    pub(crate) question_text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) correct_answer: String,
    pub(crate) display_order: i64,
    pub(crate) created_at: String,
}
