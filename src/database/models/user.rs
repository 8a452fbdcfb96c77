use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account.
///
/// The password hash is deserialization-only as far as the API surface is
/// concerned: `skip_serializing` guarantees it never appears in any response
/// body, regardless of which handler serialized the struct.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: String,
    pub campus_residence: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default role assigned at registration
pub const ROLE_USER: &str = "user";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Kelvin Mensah".to_string(),
            username: "kelvin".to_string(),
            password: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            phone_number: "+233241234567".to_string(),
            campus_residence: "Unity Hall".to_string(),
            role: ROLE_USER.to_string(),
            avatar: None,
            avatar_public_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "kelvin");
        assert_eq!(value["fullName"], "Kelvin Mensah");
        assert_eq!(value["campusResidence"], "Unity Hall");
    }
}
