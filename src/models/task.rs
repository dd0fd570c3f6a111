use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update of a task. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    pub user_id: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Pagination for listing tasks.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskQuery {
    /// Number of tasks to skip, newest first.
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    /// Maximum number of tasks returned (1..=100).
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl TaskQuery {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

impl Task {
    /// Creates a new `Task` instance from `TaskInput` and the owner's `user_id`.
    /// Sets `created_at`, `updated_at` to the current time, and `id` to a new UUID.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `update` and bumps `updated_at`.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("Test Task"), owner);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, owner);
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input("   ").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());
        assert!(input(&"a".repeat(200)).validate().is_ok());

        let long_description = TaskInput {
            title: "Valid title".to_string(),
            description: Some("b".repeat(1001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_update_validation_skips_absent_fields() {
        assert!(TaskUpdate::default().validate().is_ok());

        let blank_title = TaskUpdate {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut task = Task::new(input("Original"), Uuid::new_v4());
        task.apply(TaskUpdate {
            completed: Some(true),
            ..Default::default()
        });
        assert_eq!(task.title, "Original");
        assert_eq!(task.description.as_deref(), Some("Test Description"));
        assert!(task.completed);

        task.apply(TaskUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        });
        assert_eq!(task.title, "Renamed");
        assert!(task.completed);
    }

    #[test]
    fn test_query_bounds() {
        let query = TaskQuery {
            skip: None,
            limit: None,
        };
        assert!(query.validate().is_ok());
        assert_eq!(query.skip(), 0);
        assert_eq!(query.limit(), 100);

        let query = TaskQuery {
            skip: Some(-1),
            limit: Some(10),
        };
        assert!(query.validate().is_err());

        let query = TaskQuery {
            skip: Some(0),
            limit: Some(101),
        };
        assert!(query.validate().is_err());
    }
}
