use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ValidationError;

/// Server-assigned row identity. Opaque to the client; only compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A typed row of one remote table. `id` and `created_at` are assigned by
/// the backing store, never by the client.
pub trait TableRecord: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const TABLE: &'static str;

    fn id(&self) -> &RecordId;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Validated form input producing the insert payload for one record type.
/// Validation trims every field and rejects empty required values without
/// touching the network.
pub trait RecordDraft: Clone + Send + Sync {
    type Record: TableRecord;

    fn validate(&self) -> Result<Value, ValidationError>;
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError { field });
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl TableRecord for UserRecord {
    const TABLE: &'static str = "users";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl RecordDraft for UserDraft {
    type Record = UserRecord;

    fn validate(&self) -> Result<Value, ValidationError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        Ok(json!({ "name": name, "email": email }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl TableRecord for Note {
    const TABLE: &'static str = "notes";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Draft for one note. `user_id` is the owning session identity, carried in
/// the blank template rather than typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

impl NoteDraft {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            user_id: user_id.into(),
        }
    }
}

impl RecordDraft for NoteDraft {
    type Record = Note;

    fn validate(&self) -> Result<Value, ValidationError> {
        let title = required("title", &self.title)?;
        let user_id = required("user_id", &self.user_id)?;
        let content = self.content.trim().to_string();
        Ok(json!({ "title": title, "content": content, "user_id": user_id }))
    }
}
