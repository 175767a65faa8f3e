//! Domain model for notes, categories and the demo user.
//!
//! # Responsibility
//! - Define the records persisted by the stores and the auth stub.
//! - Keep timestamp encoding compatible with ISO-8601 millisecond strings.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` that is never reused.
//! - `updated_at >= created_at` for every note.

pub mod note;
pub mod preview;
pub mod timestamp;
pub mod user;
