use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::category::Category;

/// A single prayer request owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerEntry {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}

/// The client-settable subset of [`PrayerEntry`].
///
/// `id`, `user_id`, `is_resolved` and `created_at` are never taken from
/// request input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrayerEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
}

/// Input rejected by a request schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

impl NewPrayerEntry {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            description: None,
            category,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parses and validates a create request body.
    ///
    /// Unknown fields (including any `userId`/`ownerId`) are ignored.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let entry: NewPrayerEntry =
            serde_json::from_value(body).map_err(|e| ValidationError(e.to_string()))?;
        entry.validate()
    }

    /// Trims the name, rejects it when empty, and drops a blank description.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError("name must not be empty".to_string()));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name,
            description,
            category: self.category,
        })
    }
}

/// Extracts the `isResolved` flag from an update body; it must be a JSON boolean.
pub fn parse_resolution(body: &Value) -> Result<bool, ValidationError> {
    body.get("isResolved")
        .and_then(Value::as_bool)
        .ok_or_else(|| ValidationError("isResolved must be a boolean".to_string()))
}

impl fmt::Display for PrayerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_resolved { "x" } else { " " };
        write!(f, "[{}] #{} {}", mark, self.id, self.name)?;
        if let Some(description) = &self.description {
            write!(f, " - {}", description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_valid() {
        let entry = NewPrayerEntry::from_json(json!({
            "name": "Pray for X",
            "category": "unbelievers"
        }))
        .unwrap();

        assert_eq!(entry.name, "Pray for X");
        assert_eq!(entry.category, Category::Unbelievers);
        assert!(entry.description.is_none());
    }

    #[test]
    fn test_from_json_ignores_owner_fields() {
        let entry = NewPrayerEntry::from_json(json!({
            "name": "Aunt May",
            "description": "Surgery on Friday",
            "category": "brethren",
            "userId": 99,
            "ownerId": 99,
            "isResolved": true
        }))
        .unwrap();

        assert_eq!(entry.description.as_deref(), Some("Surgery on Friday"));
        assert_eq!(entry.category, Category::Brethren);
    }

    #[test]
    fn test_from_json_rejects_bad_category() {
        let err = NewPrayerEntry::from_json(json!({
            "name": "Someone",
            "category": "coworkers"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("coworkers"));
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        assert!(NewPrayerEntry::from_json(json!({ "category": "brethren" })).is_err());
        assert!(NewPrayerEntry::from_json(json!({ "name": "Someone" })).is_err());
        assert!(NewPrayerEntry::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = NewPrayerEntry::new("   ", Category::Brethren)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn test_validate_drops_blank_description() {
        let entry = NewPrayerEntry::new(" Bob ", Category::Brethren)
            .with_description("  ")
            .validate()
            .unwrap();

        assert_eq!(entry.name, "Bob");
        assert!(entry.description.is_none());
    }

    #[test]
    fn test_parse_resolution() {
        assert!(parse_resolution(&json!({ "isResolved": true })).unwrap());
        assert!(!parse_resolution(&json!({ "isResolved": false })).unwrap());
    }

    #[test]
    fn test_parse_resolution_requires_boolean() {
        assert!(parse_resolution(&json!({ "isResolved": "true" })).is_err());
        assert!(parse_resolution(&json!({ "isResolved": 1 })).is_err());
        assert!(parse_resolution(&json!({ "isResolved": null })).is_err());
        assert!(parse_resolution(&json!({})).is_err());
    }

    #[test]
    fn test_prayer_entry_wire_format() {
        let entry = PrayerEntry {
            id: 3,
            user_id: 7,
            name: "Pray for X".to_string(),
            description: None,
            category: Category::Unbelievers,
            is_resolved: false,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["userId"], 7);
        assert_eq!(value["isResolved"], false);
        assert_eq!(value["category"], "unbelievers");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_prayer_entry_display() {
        let entry = PrayerEntry {
            id: 12,
            user_id: 1,
            name: "Jane".to_string(),
            description: Some("new job".to_string()),
            category: Category::Brethren,
            is_resolved: true,
            created_at: Utc::now(),
        };

        assert_eq!(format!("{}", entry), "[x] #12 Jane - new job");
    }
}
