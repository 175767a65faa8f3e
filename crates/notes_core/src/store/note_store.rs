//! Note collection store.
//!
//! # Responsibility
//! - Create/update/delete notes and persist the full collection after each
//!   mutation.
//! - Serve lookup, search and display-ordered list queries as fresh copies.
//!
//! # Invariants
//! - `list` is sorted by `updated_at DESC`; ties keep insertion order.
//! - `search` never reorders or mutates the collection.
//! - Unknown-id `update`/`delete` are no-ops that neither persist nor fail.

use crate::gateway::PersistenceGateway;
use crate::logging::{sanitize_message, MAX_LOGGED_VALUE_CHARS};
use crate::model::note::{generate_note_id, Note, NoteId};
use crate::store::clock::{Clock, MonotonicStamp, SystemClock};
use crate::store::codec::{decode_notes, encode_notes};
use crate::store::{read_key, write_key};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

const MODULE: &str = "note_store";

/// Owner of the session's note collection.
pub struct NoteStore<G: PersistenceGateway> {
    gateway: G,
    key: String,
    notes: Vec<Note>,
    clock: Box<dyn Clock>,
    stamp: MonotonicStamp,
}

impl<G: PersistenceGateway> NoteStore<G> {
    /// Loads the collection stored under `key` using the system clock.
    pub fn load(gateway: G, key: impl Into<String>) -> Self {
        Self::load_with_clock(gateway, key, Box::new(SystemClock))
    }

    /// Loads the collection stored under `key` with a custom time source.
    ///
    /// Missing, unreadable or corrupt data yields an empty collection.
    pub fn load_with_clock(gateway: G, key: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        let key = key.into();
        let notes = match read_key(&gateway, MODULE, &key) {
            None => {
                debug!("event=store_load module={MODULE} status=ok source=empty count=0");
                Vec::new()
            }
            Some(raw) => match decode_notes(&raw) {
                Ok(decoded) => {
                    let notes = sanitize_loaded(decoded);
                    info!(
                        "event=store_load module={MODULE} status=ok source=gateway count={}",
                        notes.len()
                    );
                    notes
                }
                Err(err) => {
                    warn!(
                        "event=store_load module={MODULE} status=fallback error_code=decode_failed bytes={} error={err}",
                        raw.len()
                    );
                    Vec::new()
                }
            },
        };

        let mut stamp = MonotonicStamp::default();
        for note in &notes {
            stamp.observe(note.updated_at);
        }

        Self {
            gateway,
            key,
            notes,
            clock,
            stamp,
        }
    }

    /// Creates a note with a fresh id and `created_at == updated_at`.
    ///
    /// Empty strings are accepted; the category is not checked here.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Note {
        let now = self.stamp.next(self.clock.as_ref());
        let id = self.fresh_id(now);
        let note = Note::new(id, title, content, category, now);
        self.notes.push(note.clone());
        info!(
            "event=note_create module={MODULE} status=ok note_id={} count={}",
            note.id,
            self.notes.len()
        );
        self.persist();
        note
    }

    /// Replaces title, content and category and refreshes `updated_at`.
    ///
    /// Returns `false` without persisting when `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> bool {
        let Some(index) = self.position(id) else {
            debug!(
                "event=note_update module={MODULE} status=noop reason=unknown_id note_id={}",
                sanitize_message(id, MAX_LOGGED_VALUE_CHARS)
            );
            return false;
        };

        let now = self.stamp.next(self.clock.as_ref());
        let note = &mut self.notes[index];
        note.title = title.into();
        note.content = content.into();
        note.category = category.into();
        note.updated_at = now;
        info!("event=note_update module={MODULE} status=ok note_id={id}");
        self.persist();
        true
    }

    /// Removes the note with `id`; returns `false` when it does not exist.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            debug!(
                "event=note_delete module={MODULE} status=noop reason=unknown_id note_id={}",
                sanitize_message(id, MAX_LOGGED_VALUE_CHARS)
            );
            return false;
        };

        self.notes.remove(index);
        info!(
            "event=note_delete module={MODULE} status=ok note_id={id} count={}",
            self.notes.len()
        );
        self.persist();
        true
    }

    pub fn get_by_id(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|note| note.id == id).cloned()
    }

    /// Case-insensitive substring search over title or content.
    ///
    /// A blank term returns every note in storage order.
    pub fn search(&self, term: &str) -> Vec<Note> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.notes.clone();
        }
        self.notes
            .iter()
            .filter(|note| note.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// All notes, most recently updated first.
    pub fn list(&self) -> Vec<Note> {
        let mut sorted = self.notes.clone();
        // `sort_by` is stable, so equal timestamps keep insertion order.
        sorted.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        sorted
    }

    /// Number of notes currently labelled `category`.
    pub fn count_in_category(&self, category: &str) -> usize {
        self.notes
            .iter()
            .filter(|note| note.category == category)
            .count()
    }

    /// Relabels every note in `from` as `to` and persists when anything changed.
    ///
    /// This is a structural fix-up, not an edit: `updated_at` is untouched.
    pub fn reassign_category(&mut self, from: &str, to: &str) -> usize {
        if from == to {
            return 0;
        }

        let mut reassigned = 0;
        for note in self.notes.iter_mut().filter(|note| note.category == from) {
            note.category = to.to_string();
            reassigned += 1;
        }

        if reassigned > 0 {
            info!(
                "event=note_reassign module={MODULE} status=ok reassigned={reassigned} target={}",
                sanitize_message(to, MAX_LOGGED_VALUE_CHARS)
            );
            self.persist();
        }
        reassigned
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> NoteId {
        loop {
            let candidate = generate_note_id(now);
            if self.position(&candidate).is_none() {
                return candidate;
            }
            warn!("event=note_create module={MODULE} status=retry reason=id_collision");
        }
    }

    fn persist(&self) -> bool {
        match encode_notes(&self.notes) {
            Ok(encoded) => write_key(&self.gateway, MODULE, &self.key, &encoded),
            Err(err) => {
                warn!(
                    "event=store_persist module={MODULE} status=dropped error_code=encode_failed error={err}"
                );
                false
            }
        }
    }
}

/// Drops duplicate ids (first wins) and clamps `updated_at` to `created_at`.
fn sanitize_loaded(decoded: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let mut dropped = 0usize;
    let mut repaired = 0usize;
    let mut notes = Vec::with_capacity(decoded.len());

    for mut note in decoded {
        if !seen.insert(note.id.clone()) {
            dropped += 1;
            continue;
        }
        if !note.has_valid_timestamps() {
            note.updated_at = note.created_at;
            repaired += 1;
        }
        notes.push(note);
    }

    if dropped > 0 || repaired > 0 {
        warn!(
            "event=store_load module={MODULE} status=repaired duplicate_ids_dropped={dropped} timestamps_clamped={repaired}"
        );
    }
    notes
}
