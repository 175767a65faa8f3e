//! Category collection store.
//!
//! # Responsibility
//! - Add/delete category names and persist the list after each mutation.
//! - Cascade category deletion into the note store as a reassignment.
//!
//! # Invariants
//! - Names are unique by exact (case-sensitive) comparison.
//! - The list keeps insertion order.
//! - After a cascade that reassigned notes, the fallback category is listed
//!   (it is appended again when it was missing).
//! - Cascade delete mutates both collections in memory before persisting either.
//! - Cascade writes the notes blob first, then the category list; a dropped
//!   category write leaves the previous list persisted.

use crate::config::StoreConfig;
use crate::gateway::PersistenceGateway;
use crate::logging::{sanitize_message, MAX_LOGGED_VALUE_CHARS};
use crate::store::codec::{decode_categories, encode_categories};
use crate::store::note_store::NoteStore;
use crate::store::{read_key, write_key};
use log::{debug, info, warn};
use std::collections::HashSet;

const MODULE: &str = "category_store";

/// Result of one `delete` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the name was present in the category list.
    pub removed: bool,
    /// Notes relabelled to the fallback category.
    pub reassigned: usize,
    /// Whether the fallback category was appended because it was unlisted.
    pub fallback_restored: bool,
}

impl CascadeOutcome {
    pub fn is_noop(&self) -> bool {
        !self.removed && self.reassigned == 0
    }
}

/// Owner of the session's category list.
pub struct CategoryStore<G: PersistenceGateway> {
    gateway: G,
    key: String,
    fallback: String,
    categories: Vec<String>,
}

impl<G: PersistenceGateway> CategoryStore<G> {
    /// Loads the category list, seeding from `config` when nothing usable is stored.
    pub fn load(gateway: G, config: &StoreConfig) -> Self {
        let key = config.categories_key.clone();
        let categories = match read_key(&gateway, MODULE, &key) {
            None => {
                debug!(
                    "event=store_load module={MODULE} status=ok source=seed count={}",
                    config.seed_categories.len()
                );
                config.seed_categories.clone()
            }
            Some(raw) => match decode_categories(&raw) {
                Ok(decoded) => {
                    let categories = dedupe(decoded);
                    info!(
                        "event=store_load module={MODULE} status=ok source=gateway count={}",
                        categories.len()
                    );
                    categories
                }
                Err(err) => {
                    warn!(
                        "event=store_load module={MODULE} status=fallback error_code=decode_failed bytes={} error={err}",
                        raw.len()
                    );
                    config.seed_categories.clone()
                }
            },
        };

        Self {
            gateway,
            key,
            fallback: config.fallback_category.clone(),
            categories,
        }
    }

    /// Appends `name` unless it is already present.
    ///
    /// Returns whether the list changed.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            debug!(
                "event=category_add module={MODULE} status=noop reason=exists name={}",
                sanitize_message(&name, MAX_LOGGED_VALUE_CHARS)
            );
            return false;
        }

        info!(
            "event=category_add module={MODULE} status=ok name={}",
            sanitize_message(&name, MAX_LOGGED_VALUE_CHARS)
        );
        self.categories.push(name);
        self.persist();
        true
    }

    /// Removes `name` and relabels its notes with the fallback category.
    ///
    /// Notes still labelled with a name that is no longer listed are
    /// reassigned too. Deleting the fallback itself only removes it from the
    /// list; its notes keep their label.
    pub fn delete<N: PersistenceGateway>(
        &mut self,
        name: &str,
        notes: &mut NoteStore<N>,
    ) -> CascadeOutcome {
        let logged_name = sanitize_message(name, MAX_LOGGED_VALUE_CHARS);
        let position = self.categories.iter().position(|current| current == name);
        let orphans = if name == self.fallback {
            0
        } else {
            notes.count_in_category(name)
        };
        if position.is_none() && orphans == 0 {
            debug!(
                "event=category_delete module={MODULE} status=noop reason=unknown name={logged_name}"
            );
            return CascadeOutcome::default();
        }

        if let Some(index) = position {
            self.categories.remove(index);
        }
        let reassigned = notes.reassign_category(name, &self.fallback);
        let fallback_restored = reassigned > 0 && !self.contains(&self.fallback);
        if fallback_restored {
            self.categories.push(self.fallback.clone());
        }
        if position.is_some() || fallback_restored {
            self.persist();
        }

        info!(
            "event=category_delete module={MODULE} status=ok name={logged_name} removed={} reassigned={reassigned} fallback_restored={fallback_restored}",
            position.is_some()
        );
        CascadeOutcome {
            removed: position.is_some(),
            reassigned,
            fallback_restored,
        }
    }

    /// Category names in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.categories.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|current| current == name)
    }

    fn persist(&self) -> bool {
        match encode_categories(&self.categories) {
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

fn dedupe(decoded: Vec<String>) -> Vec<String> {
    let total = decoded.len();
    let mut seen = HashSet::new();
    let categories: Vec<String> = decoded
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();
    if categories.len() != total {
        warn!(
            "event=store_load module={MODULE} status=repaired duplicate_names_dropped={}",
            total - categories.len()
        );
    }
    categories
}
