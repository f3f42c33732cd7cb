//! Change event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection whose documents changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    User,
    Course,
}

impl Collection {
    /// Returns the topic namespace for this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::Course => "course",
        }
    }
}

/// A payload-free notification that something in a collection changed.
///
/// Subscribers recompute from the store; the event never says which
/// document moved or how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique identifier for this event instance.
    pub id: String,
    pub collection: Collection,
    /// Component that emitted the event.
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Creates a new change event.
    pub fn new(collection: Collection) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            collection,
            source: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user_changed() -> Self {
        Self::new(Collection::User)
    }

    pub fn course_changed() -> Self {
        Self::new(Collection::Course)
    }

    /// Sets the emitting component.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the topic string (e.g., "user.changed").
    pub fn topic(&self) -> String {
        format!("{}.changed", self.collection.as_str())
    }

    /// Checks if this event matches a subscription pattern.
    ///
    /// Patterns support an exact topic ("course.changed"), a collection
    /// wildcard ("course.*") and "*" for everything.
    pub fn matches(&self, pattern: &str) -> bool {
        if pattern == "*" {
            return true;
        }

        match pattern.strip_suffix(".*") {
            Some(namespace) => namespace == self.collection.as_str(),
            None => self.topic() == pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic() {
        assert_eq!(ChangeEvent::user_changed().topic(), "user.changed");
        assert_eq!(ChangeEvent::course_changed().topic(), "course.changed");
    }

    #[test]
    fn test_pattern_matching() {
        let event = ChangeEvent::user_changed();

        assert!(event.matches("user.changed"));
        assert!(event.matches("user.*"));
        assert!(event.matches("*"));
        assert!(!event.matches("user.deleted"));
        assert!(!event.matches("course.*"));
        assert!(!event.matches("use.*"));
    }

    #[test]
    fn test_source() {
        let event = ChangeEvent::course_changed().with_source("catalog");

        assert_eq!(event.source.as_deref(), Some("catalog"));
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ChangeEvent::user_changed()).unwrap();
        assert_eq!(json["collection"], "user");
        assert_eq!(json["source"], serde_json::Value::Null);
    }
}
