//! Event data model.
//!
//! Defines the wire schema for event submissions ([`EventDraft`]) and the
//! persisted document shape ([`EventDocument`]). The draft is a validated
//! request schema: required fields are typed as required, optional fields
//! carry explicit defaults, and browser quirks (a blank `maxAttendees` text
//! field, a blank category) are coerced at the boundary instead of leaking
//! into storage.
//!
//! Events are append-only in the current surface: once inserted, there is no
//! update or delete path, so a document never changes after
//! [`EventDocument::from_draft`] builds it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed set of event categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Social,
    Business,
    Education,
    Sports,
    #[default]
    Other,
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "social" => Ok(Self::Social),
            "business" => Ok(Self::Business),
            "education" => Ok(Self::Education),
            "sports" => Ok(Self::Sports),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Social => "social",
            Self::Business => "business",
            Self::Education => "education",
            Self::Sports => "sports",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// Event lifecycle status. Every event starts out `upcoming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Completed,
    Cancelled,
}

/// Incoming event submission, as posted by the event form.
///
/// `eventName`, `date`, `time`, and `location` are required; everything else
/// defaults per the data model (`description` empty, `maxAttendees` null,
/// `category` "other", `isPublic` false).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub event_name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Calendar date of the event (`YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Time-of-day string, stored verbatim (e.g. `18:00`).
    pub time: String,

    pub location: String,

    /// Optional attendee cap. A blank text-field value (`""`) or a numeric
    /// string both coerce the way the browser form's number input does.
    #[serde(default, deserialize_with = "deserialize_max_attendees")]
    pub max_attendees: Option<i64>,

    /// Optional category; blank coerces to the default.
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Option<EventCategory>,

    #[serde(default)]
    pub is_public: Option<bool>,
}

/// The persisted event record, one per document in the `events` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    /// Store-assigned identifier, set at insertion time.
    ///
    /// Serialized as a plain hex string so API responses carry `"_id":
    /// "<hex>"` rather than the extended-JSON object form. Inserts are
    /// unaffected: the field is `None` until the store assigns it.
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_id_hex"
    )]
    pub id: Option<ObjectId>,

    pub event_name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    pub max_attendees: Option<i64>,
    pub category: EventCategory,
    pub is_public: bool,

    /// Attendee references; always empty at creation.
    pub attendees: Vec<String>,

    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventDocument {
    /// Builds the document to persist from a submitted draft, applying the
    /// creation-time defaults.
    #[must_use]
    pub fn from_draft(draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            event_name: draft.event_name,
            description: draft.description.unwrap_or_default(),
            date: draft.date.and_time(NaiveTime::MIN).and_utc(),
            time: draft.time,
            location: draft.location,
            max_attendees: draft.max_attendees,
            category: draft.category.unwrap_or_default(),
            is_public: draft.is_public.unwrap_or(false),
            attendees: Vec::new(),
            status: EventStatus::Upcoming,
            created_at: now,
            updated_at: now,
        }
    }
}

fn serialize_id_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// Accepts a number, a numeric string, a blank string, or null.
///
/// The browser form submits `maxAttendees` as text, so `""` means "unset"
/// and must become null in storage, never an empty string.
fn deserialize_max_attendees<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("invalid maxAttendees: {s}")))
            }
        }
    }
}

/// Accepts a category name, a blank string, or null; blank means "unset".
fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<EventCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft_from(value: serde_json::Value) -> EventDraft {
        serde_json::from_value(value).expect("draft should deserialize")
    }

    #[test]
    fn minimal_draft_applies_all_defaults() {
        let draft = draft_from(json!({
            "eventName": "Tech Meetup",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "Hall A"
        }));

        let now = Utc::now();
        let doc = EventDocument::from_draft(draft, now);

        assert_eq!(doc.event_name, "Tech Meetup");
        assert_eq!(doc.description, "");
        assert_eq!(doc.time, "18:00");
        assert_eq!(doc.location, "Hall A");
        assert_eq!(doc.max_attendees, None);
        assert_eq!(doc.category, EventCategory::Other);
        assert!(!doc.is_public);
        assert!(doc.attendees.is_empty());
        assert_eq!(doc.status, EventStatus::Upcoming);
        assert_eq!(doc.created_at, now);
        assert_eq!(doc.updated_at, now);
        assert!(doc.id.is_none());
    }

    #[test]
    fn draft_missing_required_field_is_rejected() {
        let result: Result<EventDraft, _> = serde_json::from_value(json!({
            "eventName": "No date",
            "time": "18:00",
            "location": "Hall A"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn draft_invalid_date_is_rejected() {
        let result: Result<EventDraft, _> = serde_json::from_value(json!({
            "eventName": "Bad date",
            "date": "June 1st",
            "time": "18:00",
            "location": "Hall A"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_max_attendees_becomes_null() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "maxAttendees": ""
        }));
        assert_eq!(draft.max_attendees, None);
    }

    #[test]
    fn numeric_string_max_attendees_is_parsed() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "maxAttendees": "25"
        }));
        assert_eq!(draft.max_attendees, Some(25));
    }

    #[test]
    fn numeric_max_attendees_is_accepted() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "maxAttendees": 40
        }));
        assert_eq!(draft.max_attendees, Some(40));
    }

    #[test]
    fn non_numeric_max_attendees_is_rejected() {
        let result: Result<EventDraft, _> = serde_json::from_value(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "maxAttendees": "lots"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_category_defaults_to_other() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "category": ""
        }));
        let doc = EventDocument::from_draft(draft, Utc::now());
        assert_eq!(doc.category, EventCategory::Other);
    }

    #[test]
    fn explicit_category_is_kept() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "category": "sports"
        }));
        let doc = EventDocument::from_draft(draft, Utc::now());
        assert_eq!(doc.category, EventCategory::Sports);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result: Result<EventDraft, _> = serde_json::from_value(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "category": "gardening"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn is_public_true_is_kept() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L",
            "isPublic": true
        }));
        let doc = EventDocument::from_draft(draft, Utc::now());
        assert!(doc.is_public);
    }

    #[test]
    fn document_serializes_with_camel_case_fields() {
        let draft = draft_from(json!({
            "eventName": "Tech Meetup",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "Hall A"
        }));
        let doc = EventDocument::from_draft(draft, Utc::now());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["eventName"], "Tech Meetup");
        assert_eq!(json["maxAttendees"], serde_json::Value::Null);
        assert_eq!(json["isPublic"], false);
        assert_eq!(json["status"], "upcoming");
        assert_eq!(json["attendees"], json!([]));
        // No identifier before insertion.
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn assigned_id_serializes_as_hex_string() {
        let draft = draft_from(json!({
            "eventName": "E",
            "date": "2025-06-01",
            "time": "18:00",
            "location": "L"
        }));
        let mut doc = EventDocument::from_draft(draft, Utc::now());
        let id = ObjectId::new();
        doc.id = Some(id);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], serde_json::Value::String(id.to_hex()));
    }

    #[test]
    fn category_display_round_trips_with_from_str() {
        for category in [
            EventCategory::Social,
            EventCategory::Business,
            EventCategory::Education,
            EventCategory::Sports,
            EventCategory::Other,
        ] {
            let parsed: EventCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }
}
