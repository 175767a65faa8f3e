//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted under the notes key.
//! - Generate collision-resistant note identifiers.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `created_at` never changes after creation.
//! - `updated_at >= created_at`.

use crate::model::preview::derive_preview;
use crate::model::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable note identifier (`note-<epoch millis>-<random suffix>`).
///
/// Kept as a string alias because persisted ids are opaque to the store.
pub type NoteId = String;

const NOTE_ID_PREFIX: &str = "note";
const NOTE_ID_SUFFIX_LEN: usize = 8;

/// User-authored note with category label and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Category name; resolved by exact match against the category list.
    pub category: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every title/content/category update.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note whose creation and update timestamps are both `now`.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            category: category.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match over title or content.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    /// Plain-text excerpt of the content for list rendering.
    pub fn preview(&self) -> Option<String> {
        derive_preview(&self.content)
    }

    /// Whether the timestamp ordering invariant holds.
    pub fn has_valid_timestamps(&self) -> bool {
        self.updated_at >= self.created_at
    }
}

/// Generates a fresh note id stamped with `now`.
pub fn generate_note_id(now: DateTime<Utc>) -> NoteId {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{NOTE_ID_PREFIX}-{}-{}",
        now.timestamp_millis(),
        &suffix[..NOTE_ID_SUFFIX_LEN]
    )
}

#[cfg(test)]
mod tests {
    use super::{generate_note_id, Note};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generated_ids_carry_timestamp_and_differ() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let first = generate_note_id(now);
        let second = generate_note_id(now);
        assert!(first.starts_with("note-1700000000123-"));
        assert_ne!(first, second);
    }

    #[test]
    fn matches_lowercase_checks_title_and_content() {
        let now = Utc::now();
        let note = Note::new("n1".to_string(), "Grocery List", "Milk, EGGS", "General", now);
        assert!(note.matches_lowercase("grocery"));
        assert!(note.matches_lowercase("eggs"));
        assert!(!note.matches_lowercase("bread"));
    }

    #[test]
    fn serialized_shape_uses_iso_timestamps() {
        let now = Utc.timestamp_millis_opt(1_714_555_800_000).unwrap();
        let note = Note::new("note-1".to_string(), "T", "C", "Work", now);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T09:30:00.000Z");
        assert_eq!(json["updated_at"], "2024-05-01T09:30:00.000Z");
        assert_eq!(json["category"], "Work");
    }
}
