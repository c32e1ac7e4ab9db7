use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User row as stored in the `users` table
///
/// Holds the password hash, so it is never serialized directly; responses
/// go through [`UserResponse`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub username: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 72, message = "must be between 1 and 72 characters"))]
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Values needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            full_name: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup("yogi@example.com", "yogi", "namaste").validate().is_ok());

        // Malformed email
        assert!(signup("not-an-email", "yogi", "namaste").validate().is_err());

        // Empty username
        assert!(signup("yogi@example.com", "", "namaste").validate().is_err());

        // Username over column width
        let long_name = "a".repeat(101);
        assert!(signup("yogi@example.com", &long_name, "namaste").validate().is_err());

        // Empty password
        assert!(signup("yogi@example.com", "yogi", "").validate().is_err());
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User {
            id: 7,
            email: "yogi@example.com".to_string(),
            username: "yogi".to_string(),
            full_name: Some("Yogi".to_string()),
            hashed_password: "$2b$04$hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(value["username"], "yogi");
        assert!(value.get("hashed_password").is_none());
        assert!(!value.to_string().contains("$2b$04$hash"));
    }
}
