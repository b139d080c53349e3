use serde::Deserialize;

use crate::schemas::lenient_i64_opt;

#[derive(Debug, Deserialize)]
pub(crate) struct UnitPayload {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub(crate) class_id: Option<i64>,
}
