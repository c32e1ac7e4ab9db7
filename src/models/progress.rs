use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One logged practice session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub routine_id: Option<i64>,
    pub yogasana_id: String,
    pub yogasana_name: String,
    /// Time spent, in whole seconds
    pub completion_time: i64,
    pub is_completed: bool,
    pub notes: Option<String>,
    /// When the practice happened
    pub practice_date: DateTime<Utc>,
    /// When the row was recorded
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress logging payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProgressCreate {
    pub routine_id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub yogasana_id: String,
    #[validate(length(min = 1, max = 255))]
    pub yogasana_name: String,
    #[validate(range(min = 0))]
    pub completion_time: i64,
    #[serde(default)]
    pub is_completed: bool,
    pub notes: Option<String>,
    /// Defaults to the time of the request
    pub practice_date: Option<DateTime<Utc>>,
}

/// Partial progress update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProgressUpdate {
    pub is_completed: Option<bool>,
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub completion_time: Option<i64>,
}

/// Aggregate practice statistics for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressStats {
    pub total_practices: i64,
    pub total_time_minutes: i64,
    pub completed_today: i64,
    pub favorite_yogasana: Option<String>,
    pub practice_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_create_defaults() {
        let payload: ProgressCreate = serde_json::from_str(
            r#"{"yogasana_id": "tadasana", "yogasana_name": "Mountain Pose", "completion_time": 90}"#,
        )
        .unwrap();

        assert!(!payload.is_completed);
        assert!(payload.routine_id.is_none());
        assert!(payload.practice_date.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_negative_completion_time_rejected() {
        let payload = ProgressCreate {
            routine_id: None,
            yogasana_id: "tadasana".to_string(),
            yogasana_name: "Mountain Pose".to_string(),
            completion_time: -1,
            is_completed: true,
            notes: None,
            practice_date: None,
        };
        assert!(payload.validate().is_err());

        let update = ProgressUpdate {
            completion_time: Some(-10),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
