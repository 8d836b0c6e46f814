use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A score left by a principal on a target id.
///
/// `date` and `userId` are owned by the server: `date` is the last write time in
/// epoch seconds and `userId` is the authenticated caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Rating {
    pub id: i64,
    pub active: bool,
    pub anonymous: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub date: i64,
    /// Opaque client data.
    pub extra: Value,
    pub score: i32,
    pub target: i64,
    pub user_id: i64,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            id: 0,
            active: true,
            anonymous: true,
            comment: String::new(),
            date: 0,
            extra: Value::Object(Default::default()),
            score: 0,
            target: 0,
            user_id: 0,
        }
    }
}
