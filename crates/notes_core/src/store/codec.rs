//! JSON encoding of persisted collections.
//!
//! Notes are stored as an array of note records, categories as an array of
//! names. Decoding is strict; callers decide how to fall back.

use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Encoding/decoding failure for a persisted blob.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid persisted json: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub fn encode_notes(notes: &[Note]) -> CodecResult<String> {
    Ok(serde_json::to_string(notes)?)
}

pub fn decode_notes(raw: &str) -> CodecResult<Vec<Note>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_categories(categories: &[String]) -> CodecResult<String> {
    Ok(serde_json::to_string(categories)?)
}

pub fn decode_categories(raw: &str) -> CodecResult<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::{decode_categories, decode_notes, encode_notes};
    use crate::model::note::Note;
    use chrono::{TimeZone, Utc};

    #[test]
    fn notes_round_trip_preserves_ids_fields_and_timestamps() {
        let created = Utc.timestamp_millis_opt(1_714_555_800_000).unwrap();
        let mut edited = Note::new("note-2".to_string(), "Plan", "", "Work", created);
        edited.updated_at = Utc.timestamp_millis_opt(1_714_555_801_250).unwrap();
        let notes = vec![
            Note::new("note-1".to_string(), "Grocery List", "milk\neggs", "General", created),
            edited,
        ];

        let decoded = decode_notes(&encode_notes(&notes).unwrap()).unwrap();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn decodes_records_written_by_browser_clients() {
        let raw = r#"[{"id":"note-1714555800000-4821","title":"T","content":"C",
            "category":"Ideas","created_at":"2024-05-01T09:30:00.000Z",
            "updated_at":"2024-05-01T10:00:00.500Z"}]"#;
        let notes = decode_notes(raw).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "note-1714555800000-4821");
        assert_eq!(notes[0].updated_at.timestamp_millis(), 1_714_557_600_500);
    }

    #[test]
    fn corrupt_blobs_are_errors() {
        assert!(decode_notes("{not json").is_err());
        assert!(decode_notes(r#"[{"id":"x"}]"#).is_err());
        assert!(decode_categories(r#"{"General":true}"#).is_err());
    }
}
