//! Request input validation. Rules collect itemized messages which surface
//! as a 400 `{"error": [...]}` response.

use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::item::{ItemDraft, ItemLocation};
use crate::error::ApiError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const ITEM_NAME_MAX: usize = 100;
pub const ITEM_DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub campus_residence: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Profile update fields. A submitted password is deserialized here only so
/// it can be silently discarded; it never reaches the persistence layer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub campus_residence: String,
}

/// Raw item fields as they arrive from the multipart form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub last_seen_location: String,
    #[serde(default)]
    pub found_location: String,
}

pub fn validate_register_input(input: &RegisterInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    check_full_name(&input.full_name, &mut errors);
    check_username(&input.username, &mut errors);
    check_password(&input.password, &mut errors);
    check_phone_number(&input.phone_number, &mut errors);
    check_campus_residence(&input.campus_residence, &mut errors);

    finish(errors)
}

pub fn validate_login_input(input: &LoginInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    check_username(&input.username, &mut errors);
    if input.password.is_empty() {
        errors.push("password is required".to_string());
    }

    finish(errors)
}

pub fn validate_update_user_input(input: &UpdateUserInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    check_full_name(&input.full_name, &mut errors);
    check_username(&input.username, &mut errors);
    check_phone_number(&input.phone_number, &mut errors);
    check_campus_residence(&input.campus_residence, &mut errors);

    finish(errors)
}

/// Validate raw item fields and produce the typed draft. The conditional
/// location requirement is keyed by category: lost items must carry a last
/// seen location, found items a found location; the other field is dropped.
pub fn validate_item_input(input: &ItemInput) -> Result<ItemDraft, ApiError> {
    let mut errors = Vec::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.push("Item name is required".to_string());
    } else if name.len() > ITEM_NAME_MAX {
        errors.push(format!(
            "Item name must not exceed {} characters",
            ITEM_NAME_MAX
        ));
    }

    let description = input.description.trim();
    if description.is_empty() {
        errors.push("Description is required".to_string());
    } else if description.len() > ITEM_DESCRIPTION_MAX {
        errors.push(format!(
            "Description must not exceed {} characters",
            ITEM_DESCRIPTION_MAX
        ));
    }

    let location = match input.category.as_str() {
        "lost" => {
            let last_seen = input.last_seen_location.trim();
            if last_seen.is_empty() {
                errors.push("Last seen location is required for lost items".to_string());
                None
            } else {
                Some(ItemLocation::Lost {
                    last_seen_location: last_seen.to_string(),
                })
            }
        }
        "found" => {
            let found = input.found_location.trim();
            if found.is_empty() {
                errors.push("Found location is required for found items".to_string());
                None
            } else {
                Some(ItemLocation::Found {
                    found_location: found.to_string(),
                })
            }
        }
        "" => {
            errors.push("Category is required".to_string());
            None
        }
        _ => {
            errors.push("Category must be either lost or found".to_string());
            None
        }
    };

    match (location, errors.is_empty()) {
        (Some(location), true) => Ok(ItemDraft {
            name: name.to_string(),
            description: description.to_string(),
            location,
        }),
        _ => Err(ApiError::validation(errors)),
    }
}

/// Path ids must be well-formed UUIDs; anything else is a validation error
pub fn parse_id_param(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::validation(vec!["invalid item id".to_string()]))
}

fn finish(errors: Vec<String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

fn check_full_name(value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push("full name is required".to_string());
    }
}

fn check_username(value: &str, errors: &mut Vec<String>) {
    let username = value.trim();
    if username.is_empty() {
        errors.push("username is required".to_string());
        return;
    }
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX || !valid_chars {
        errors.push(
            "username must be 3-20 characters long and contain only letters, numbers, and underscores"
                .to_string(),
        );
    }
}

fn check_password(value: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push("password is required".to_string());
        return;
    }
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_symbol = value.chars().any(|c| !c.is_alphanumeric());
    if value.len() < 8 || !has_upper || !has_lower || !has_digit || !has_symbol {
        errors.push(
            "Password must be at least 8 characters long and include uppercase, lowercase, a number, and a special character."
                .to_string(),
        );
    }
}

fn check_phone_number(value: &str, errors: &mut Vec<String>) {
    let phone = value.trim();
    if phone.is_empty() {
        errors.push("phone number is required".to_string());
        return;
    }
    let digits: String = phone
        .strip_prefix('+')
        .unwrap_or(phone)
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    let plausible = (9..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if !plausible {
        errors.push("invalid phone number".to_string());
    }
}

fn check_campus_residence(value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push("campus residence is required".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_input(category: &str) -> ItemInput {
        ItemInput {
            name: "Wallet".to_string(),
            description: "Black leather".to_string(),
            category: category.to_string(),
            last_seen_location: String::new(),
            found_location: String::new(),
        }
    }

    #[test]
    fn lost_item_requires_last_seen_location() {
        let err = validate_item_input(&item_input("lost")).unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec!["Last seen location is required for lost items"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let mut input = item_input("lost");
        input.last_seen_location = "Library".to_string();
        let draft = validate_item_input(&input).unwrap();
        assert_eq!(
            draft.location,
            ItemLocation::Lost {
                last_seen_location: "Library".to_string()
            }
        );
    }

    #[test]
    fn found_item_requires_found_location() {
        let err = validate_item_input(&item_input("found")).unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert_eq!(messages, vec!["Found location is required for found items"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = validate_item_input(&item_input("stolen")).unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert_eq!(messages, vec!["Category must be either lost or found"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn item_field_lengths_are_capped() {
        let mut input = item_input("found");
        input.found_location = "Front desk".to_string();
        input.name = "x".repeat(101);
        input.description = "y".repeat(501);
        let err = validate_item_input(&input).unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].contains("100"));
                assert!(messages[1].contains("500"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn register_input_collects_all_errors() {
        let input = RegisterInput {
            full_name: String::new(),
            username: "x".to_string(),
            password: "weak".to_string(),
            phone_number: "abc".to_string(),
            campus_residence: String::new(),
        };
        let err = validate_register_input(&input).unwrap_err();
        match err {
            ApiError::Validation(messages) => assert_eq!(messages.len(), 5),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn register_input_accepts_valid_fields() {
        let input = RegisterInput {
            full_name: "Kelvin Mensah".to_string(),
            username: "kelvin_m".to_string(),
            password: "Sup3r$ecret".to_string(),
            phone_number: "+233241234567".to_string(),
            campus_residence: "Unity Hall".to_string(),
        };
        assert!(validate_register_input(&input).is_ok());
    }

    #[test]
    fn username_rules_match_the_register_contract() {
        let mut errors = Vec::new();
        check_username("ab", &mut errors);
        check_username(&"a".repeat(21), &mut errors);
        check_username("bad name", &mut errors);
        assert_eq!(errors.len(), 3);

        errors.clear();
        check_username("fine_name3", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        assert!(parse_id_param("not-a-uuid").is_err());
        assert!(parse_id_param("6b7f1e0a-9dd5-4a34-8f6a-3f6f3c2b1a00").is_ok());
    }
}
