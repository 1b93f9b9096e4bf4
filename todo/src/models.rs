use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}

/// Browser form payload for create and update. Empty strings stand in for
/// absent optional fields; the checkbox is present only when checked.
#[derive(Debug, Default, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub is_resolved: Option<String>,
}

impl TodoForm {
    pub fn parsed_due_date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
    }

    pub fn resolved(&self) -> bool {
        self.is_resolved.is_some()
    }
}
