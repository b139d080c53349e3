use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) const POSITIONS: &[&str] = &["top", "bottom", "side"];
pub(crate) const SIZES: &[&str] = &["small", "medium", "large"];

/// Titles and names are restricted to the Arabic Unicode block plus
/// whitespace, matching the client-side check.
pub(crate) fn is_arabic_text(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| ('\u{0600}'..='\u{06FF}').contains(&c) || c.is_whitespace())
}

pub(crate) fn validate_position(position: &str, field: &str) -> Result<(), ApiError> {
    if POSITIONS.contains(&position) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid {field} position '{position}'")))
    }
}

pub(crate) fn validate_size(size: &str, field: &str) -> Result<(), ApiError> {
    if SIZES.contains(&size) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid {field} size '{size}'")))
    }
}

/// Normalize an A-D answer letter, accepting lowercase input.
pub(crate) fn normalize_answer_letter(answer: &str) -> Result<String, ApiError> {
    let normalized = answer.trim().to_ascii_uppercase();
    match normalized.as_str() {
        "A" | "B" | "C" | "D" => Ok(normalized),
        _ => Err(ApiError::BadRequest("Answer must be one of A, B, C, D".to_string())),
    }
}

pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        "webp" => mime == "image/webp",
        "gif" => mime == "image/gif",
        _ => false,
    }
}
