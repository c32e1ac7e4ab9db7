use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A user-authored yoga routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Routine {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub goal: String,
    pub description: Option<String>,
    /// Serialized list of pose ids, opaque to the server
    pub yogasana_ids: String,
    pub duration_minutes: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Routine creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoutineCreate {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub goal: String,
    pub description: Option<String>,
    pub yogasana_ids: String,
    #[validate(range(min = 0))]
    pub duration_minutes: Option<i64>,
}

/// Partial routine update
///
/// An absent field leaves its column untouched. The nullable columns
/// distinguish absent (`None`) from an explicit `null` (`Some(None)`), which
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoutineUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub yogasana_ids: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0))]
    pub duration_minutes: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

/// Wrap any value that appears in the payload, `null` included, in `Some`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_create_validation() {
        let valid = RoutineCreate {
            title: "Morning flow".to_string(),
            goal: "flexibility".to_string(),
            description: None,
            yogasana_ids: "[\"tadasana\"]".to_string(),
            duration_minutes: Some(20),
        };
        assert!(valid.validate().is_ok());

        let empty_title = RoutineCreate {
            title: String::new(),
            ..valid.clone()
        };
        assert!(empty_title.validate().is_err());

        let negative_duration = RoutineCreate {
            duration_minutes: Some(-5),
            ..valid
        };
        assert!(negative_duration.validate().is_err());
    }

    #[test]
    fn test_update_absent_fields_deserialize_as_none() {
        let update: RoutineUpdate = serde_json::from_str(r#"{"title": "Evening flow"}"#).unwrap();

        assert_eq!(update.title.as_deref(), Some("Evening flow"));
        assert!(update.goal.is_none());
        assert!(update.yogasana_ids.is_none());
        assert!(update.is_active.is_none());
        assert!(update.description.is_none());
        assert!(update.duration_minutes.is_none());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_explicit_null_clears_nullable_fields() {
        let update: RoutineUpdate =
            serde_json::from_str(r#"{"description": null, "duration_minutes": null}"#).unwrap();

        assert_eq!(update.description, Some(None));
        assert_eq!(update.duration_minutes, Some(None));
        assert!(update.validate().is_ok());

        let update: RoutineUpdate =
            serde_json::from_str(r#"{"description": "Slow", "duration_minutes": 15}"#).unwrap();
        assert_eq!(update.description, Some(Some("Slow".to_string())));
        assert_eq!(update.duration_minutes, Some(Some(15)));
    }

    #[test]
    fn test_update_rejects_negative_duration() {
        let update = RoutineUpdate {
            duration_minutes: Some(Some(-1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = RoutineUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
