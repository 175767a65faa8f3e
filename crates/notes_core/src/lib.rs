//! Core domain logic for the notes manager.
//! This crate is the single source of truth for note/category invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;

pub use auth::AuthService;
pub use config::{ConfigError, StoreConfig};
pub use gateway::{
    GatewayError, GatewayResult, MemoryGateway, PersistenceGateway, SqliteGateway,
    UnavailableGateway,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use model::user::User;
pub use session::{NotesSession, StoreEvent, SubscriptionId};
pub use store::category_store::{CascadeOutcome, CategoryStore};
pub use store::clock::{Clock, ManualClock, SystemClock};
pub use store::codec::{CodecError, CodecResult};
pub use store::note_store::NoteStore;

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
