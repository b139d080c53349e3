use serde::Deserialize;
use validator::Validate;

/// Create and update share the same single-field payload.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassPayload {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
}
