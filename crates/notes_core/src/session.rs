//! Application session facade.
//!
//! # Responsibility
//! - Construct the note store, category store and auth stub once over one
//!   shared gateway handle.
//! - Expose the UI-facing operations and notify subscribers after every
//!   state-changing mutation.
//!
//! # Invariants
//! - One session owns exactly one copy of each collection.
//! - Subscribers are notified after the mutation (and its write-through)
//!   completed; no-op calls notify nobody.

use crate::auth::AuthService;
use crate::config::{ConfigError, StoreConfig};
use crate::gateway::PersistenceGateway;
use crate::logging::{sanitize_message, MAX_LOGGED_VALUE_CHARS};
use crate::model::note::{Note, NoteId};
use crate::model::user::User;
use crate::store::category_store::{CascadeOutcome, CategoryStore};
use crate::store::clock::{Clock, SystemClock};
use crate::store::note_store::NoteStore;
use log::warn;
use std::rc::Rc;

/// State change published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    NoteCreated(NoteId),
    NoteUpdated(NoteId),
    NoteDeleted(NoteId),
    CategoryAdded(String),
    CategoryDeleted { name: String, reassigned: usize },
    SignedIn(User),
    SignedOut,
}

/// Handle returned by [`NotesSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// One application session: stores, auth and change notification.
pub struct NotesSession<G: PersistenceGateway> {
    notes: NoteStore<Rc<G>>,
    categories: CategoryStore<Rc<G>>,
    auth: AuthService<Rc<G>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<G: PersistenceGateway> NotesSession<G> {
    /// Opens a session with the default keys and category seed.
    pub fn open(gateway: G) -> Self {
        Self::from_parts(Rc::new(gateway), &StoreConfig::default(), Box::new(SystemClock))
    }

    /// Opens a session with a validated custom configuration.
    pub fn open_with_config(gateway: G, config: &StoreConfig) -> Result<Self, ConfigError> {
        Self::open_with_clock(gateway, config, Box::new(SystemClock))
    }

    /// Opens a session with a custom configuration and time source.
    pub fn open_with_clock(
        gateway: G,
        config: &StoreConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(Rc::new(gateway), config, clock))
    }

    fn from_parts(gateway: Rc<G>, config: &StoreConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            notes: NoteStore::load_with_clock(
                Rc::clone(&gateway),
                config.notes_key.as_str(),
                clock,
            ),
            categories: CategoryStore::load(Rc::clone(&gateway), config),
            auth: AuthService::load(gateway, config),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Registers `listener` for every subsequent [`StoreEvent`].
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes one listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub fn list_notes(&self) -> Vec<Note> {
        self.notes.list()
    }

    pub fn search_notes(&self, term: &str) -> Vec<Note> {
        self.notes.search(term)
    }

    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.notes.get_by_id(id)
    }

    /// Creates a note; an unlisted category is accepted but logged.
    pub fn create_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Note {
        let category = category.into();
        self.warn_unlisted_category("note_create", &category);
        let note = self.notes.create(title, content, category);
        self.emit(StoreEvent::NoteCreated(note.id.clone()));
        note
    }

    /// Updates a note; unknown ids are silent no-ops (returns `false`).
    pub fn update_note(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> bool {
        let category = category.into();
        let updated = self.notes.update(id, title, content, category.clone());
        if updated {
            self.warn_unlisted_category("note_update", &category);
            self.emit(StoreEvent::NoteUpdated(id.to_string()));
        }
        updated
    }

    /// Deletes a note; unknown ids are silent no-ops (returns `false`).
    pub fn delete_note(&mut self, id: &str) -> bool {
        let deleted = self.notes.delete(id);
        if deleted {
            self.emit(StoreEvent::NoteDeleted(id.to_string()));
        }
        deleted
    }

    pub fn list_categories(&self) -> Vec<String> {
        self.categories.list()
    }

    pub fn add_category(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let added = self.categories.add(name.clone());
        if added {
            self.emit(StoreEvent::CategoryAdded(name));
        }
        added
    }

    /// Deletes a category and moves its notes to the fallback category.
    pub fn delete_category(&mut self, name: &str) -> CascadeOutcome {
        let outcome = self.categories.delete(name, &mut self.notes);
        if !outcome.is_noop() {
            self.emit(StoreEvent::CategoryDeleted {
                name: name.to_string(),
                reassigned: outcome.reassigned,
            });
        }
        outcome
    }

    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let accepted = self.auth.login(email, password);
        self.emit_sign_in(accepted);
        accepted
    }

    pub fn register(&mut self, email: &str, password: &str) -> bool {
        let accepted = self.auth.register(email, password);
        self.emit_sign_in(accepted);
        accepted
    }

    pub fn logout(&mut self) {
        let was_signed_in = self.auth.is_authenticated();
        self.auth.logout();
        if was_signed_in {
            self.emit(StoreEvent::SignedOut);
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth.last_error()
    }

    fn emit_sign_in(&mut self, accepted: bool) {
        if let (true, Some(user)) = (accepted, self.auth.current_user()) {
            self.emit(StoreEvent::SignedIn(user));
        }
    }

    fn warn_unlisted_category(&self, event: &'static str, category: &str) {
        if !self.categories.contains(category) {
            warn!(
                "event={event} module=session status=accepted reason=unlisted_category category={}",
                sanitize_message(category, MAX_LOGGED_VALUE_CHARS)
            );
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
