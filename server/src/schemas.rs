//! Inbound payloads and outbound envelopes.
//!
//! # Design
//! Payloads derive `Validate` so length rules live next to the fields they
//! constrain; the `extract` module runs them before a handler sees the value.
//! Every successful response is wrapped in an [`Envelope`] carrying its own
//! `code` next to the HTTP status.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::model::Todo;

/// Request payload for creating a todo. New todos always start incomplete.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodo {
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Request payload for a partial update.
///
/// Absent fields keep their stored value. `description` distinguishes an
/// explicit `null` (clear it) from an absent key (leave it alone).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTodo {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Wraps any present value (including `null`) in `Some`, so a missing key
/// falls back to the field default of `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query string for the list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
}

/// The `{code, message, data}` wrapper around every successful response.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn new(code: u16, message: &str, data: Option<T>) -> Self {
        Self {
            code,
            message: message.to_string(),
            data,
        }
    }
}

impl Envelope<Vec<Todo>> {
    pub fn list(todos: Vec<Todo>) -> Self {
        Self::new(200, "success", Some(todos))
    }
}

impl Envelope<Todo> {
    pub fn fetched(todo: Todo) -> Self {
        Self::new(200, "success", Some(todo))
    }

    /// Carries code 201 while the HTTP status stays 200.
    pub fn created(todo: Todo) -> Self {
        Self::new(201, "Todo created successfully", Some(todo))
    }

    pub fn updated(todo: Todo) -> Self {
        Self::new(200, "Todo updated successfully", Some(todo))
    }
}

impl Envelope<()> {
    pub fn deleted() -> Self {
        Self::new(200, "Todo deleted successfully", None)
    }
}

impl Envelope<DeletedCount> {
    pub fn deleted_completed(deleted_count: u64) -> Self {
        Self::new(
            200,
            "Completed todos deleted successfully",
            Some(DeletedCount { deleted_count }),
        )
    }

    pub fn deleted_all(deleted_count: u64) -> Self {
        Self::new(
            200,
            "All todos deleted successfully",
            Some(DeletedCount { deleted_count }),
        )
    }
}

/// Summary payload for bulk deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedCount {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootInfo {
    pub code: u16,
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub code: u16,
    pub status: &'static str,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_accepts_title_only() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert!(input.description.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_rejects_empty_title() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn create_todo_length_limits_count_characters() {
        let input = CreateTodo {
            title: "é".repeat(255),
            description: Some("ü".repeat(1000)),
        };
        assert!(input.validate().is_ok());

        let input = CreateTodo {
            title: "a".repeat(256),
            description: Some("b".repeat(1001)),
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn update_todo_distinguishes_null_from_absent_description() {
        let cleared: UpdateTodo = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let untouched: UpdateTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.completed, Some(true));
    }

    #[test]
    fn update_todo_validates_present_fields_only() {
        let input = UpdateTodo {
            title: Some(String::new()),
            ..UpdateTodo::default()
        };
        assert!(input.validate().is_err());

        let input = UpdateTodo {
            description: Some(Some("x".repeat(1001))),
            ..UpdateTodo::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn delete_envelope_omits_data() {
        let json = serde_json::to_value(Envelope::deleted()).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["message"], "Todo deleted successfully");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn bulk_delete_envelope_reports_count() {
        let json = serde_json::to_value(Envelope::deleted_completed(3)).unwrap();
        assert_eq!(json["data"]["deleted_count"], 3);
    }
}
