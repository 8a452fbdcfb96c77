use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lost,
    Found,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lost => "lost",
            Category::Found => "found",
        }
    }
}

/// Category and its conditionally-required location, as one tagged union.
///
/// A lost item always carries where it was last seen and a found item where
/// it was found; a record with both or neither is unrepresentable. Serializes
/// flattened into the item JSON as
/// `{"category": "lost", "lastSeenLocation": "..."}` /
/// `{"category": "found", "foundLocation": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ItemLocation {
    #[serde(rename_all = "camelCase")]
    Lost { last_seen_location: String },
    #[serde(rename_all = "camelCase")]
    Found { found_location: String },
}

impl ItemLocation {
    pub fn category(&self) -> Category {
        match self {
            ItemLocation::Lost { .. } => Category::Lost,
            ItemLocation::Found { .. } => Category::Found,
        }
    }

    /// Split into the `(last_seen_location, found_location)` column pair
    pub fn columns(&self) -> (Option<&str>, Option<&str>) {
        match self {
            ItemLocation::Lost { last_seen_location } => (Some(last_seen_location), None),
            ItemLocation::Found { found_location } => (None, Some(found_location)),
        }
    }

    /// Rebuild from the stored column triple, rejecting rows that violate
    /// the category/location invariant.
    pub fn from_columns(
        category: &str,
        last_seen_location: Option<String>,
        found_location: Option<String>,
    ) -> Result<Self, LocationIntegrityError> {
        match category {
            "lost" => match last_seen_location {
                Some(loc) if !loc.is_empty() => Ok(ItemLocation::Lost {
                    last_seen_location: loc,
                }),
                _ => Err(LocationIntegrityError::MissingLocation("lost")),
            },
            "found" => match found_location {
                Some(loc) if !loc.is_empty() => Ok(ItemLocation::Found {
                    found_location: loc,
                }),
                _ => Err(LocationIntegrityError::MissingLocation("found")),
            },
            other => Err(LocationIntegrityError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocationIntegrityError {
    #[error("unknown item category: {0}")]
    UnknownCategory(String),

    #[error("{0} item is missing its location")]
    MissingLocation(&'static str),
}

/// A lost or found listing record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub location: ItemLocation,
    pub claimed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_public_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Item {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let category: String = row.try_get("category")?;
        let last_seen_location: Option<String> = row.try_get("last_seen_location")?;
        let found_location: Option<String> = row.try_get("found_location")?;

        let location = ItemLocation::from_columns(&category, last_seen_location, found_location)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "category".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            location,
            claimed: row.try_get("claimed")?,
            image: row.try_get("image")?,
            image_public_id: row.try_get("image_public_id")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Validated fields for an item create or full-field update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub location: ItemLocation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item(location: ItemLocation) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Wallet".to_string(),
            description: "Black leather".to_string(),
            location,
            claimed: false,
            image: None,
            image_public_id: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lost_item_serializes_with_flattened_location() {
        let item = sample_item(ItemLocation::Lost {
            last_seen_location: "Library".to_string(),
        });
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["category"], json!("lost"));
        assert_eq!(value["lastSeenLocation"], json!("Library"));
        assert!(value.get("foundLocation").is_none());
        assert_eq!(value["claimed"], json!(false));
    }

    #[test]
    fn found_item_serializes_with_found_location_only() {
        let item = sample_item(ItemLocation::Found {
            found_location: "Front desk".to_string(),
        });
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["category"], json!("found"));
        assert_eq!(value["foundLocation"], json!("Front desk"));
        assert!(value.get("lastSeenLocation").is_none());
    }

    #[test]
    fn from_columns_enforces_the_category_invariant() {
        assert!(ItemLocation::from_columns("lost", Some("Library".into()), None).is_ok());
        assert!(ItemLocation::from_columns("found", None, Some("Desk".into())).is_ok());

        assert!(ItemLocation::from_columns("lost", None, Some("Desk".into())).is_err());
        assert!(ItemLocation::from_columns("found", None, None).is_err());
        assert!(ItemLocation::from_columns("misplaced", Some("x".into()), None).is_err());
    }

    #[test]
    fn columns_round_trip() {
        let lost = ItemLocation::Lost {
            last_seen_location: "Library".to_string(),
        };
        assert_eq!(lost.columns(), (Some("Library"), None));
        assert_eq!(lost.category(), Category::Lost);

        let found = ItemLocation::Found {
            found_location: "Desk".to_string(),
        };
        assert_eq!(found.columns(), (None, Some("Desk")));
        assert_eq!(found.category(), Category::Found);
    }
}
