use serde::{Deserialize, Serialize};

use crate::db::models::{Image, Lesson, Video};
use crate::schemas::{lenient_i64, lenient_i64_opt};

#[derive(Debug, Deserialize)]
pub(crate) struct LessonPayload {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub(crate) unit_id: Option<i64>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default)]
    pub(crate) videos: Vec<VideoPayload>,
    #[serde(default)]
    pub(crate) images: Vec<ImagePayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoPayload {
    #[serde(default)]
    pub(crate) video_url: String,
    #[serde(default = "default_video_position")]
    pub(crate) position: String,
    #[serde(default = "default_video_size")]
    pub(crate) size: String,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) display_order: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImagePayload {
    #[serde(default)]
    pub(crate) image_path: String,
    #[serde(default = "default_image_position")]
    pub(crate) position: String,
    #[serde(default = "default_image_size")]
    pub(crate) size: String,
    #[serde(default)]
    pub(crate) caption: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) display_order: i64,
}

fn default_video_position() -> String {
    "bottom".to_string()
}

fn default_video_size() -> String {
    "large".to_string()
}

fn default_image_position() -> String {
    "bottom".to_string()
}

fn default_image_size() -> String {
    "medium".to_string()
}

/// Full lesson payload: the row plus its ordered attachments.
#[derive(Debug, Serialize)]
pub(crate) struct LessonDetailResponse {
    #[serde(flatten)]
    pub(crate) lesson: Lesson,
    pub(crate) videos: Vec<Video>,
    pub(crate) images: Vec<Image>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadImageResponse {
    pub(crate) url: String,
    pub(crate) size: i64,
}
