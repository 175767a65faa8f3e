//! Placeholder authentication backed by the persistence gateway.
//!
//! # Responsibility
//! - Accept any minimally-shaped email/password pair as the demo user.
//! - Persist and restore the signed-in user and token.
//!
//! # Invariants
//! - No credential is verified and no token expires.
//! - `user` and `token` are either both set or both cleared.
//! - Passwords are never stored or logged.

use crate::config::StoreConfig;
use crate::gateway::PersistenceGateway;
use crate::model::user::{User, DEMO_TOKEN};
use crate::store::{read_key, remove_key, write_key};
use log::{info, warn};

const MODULE: &str = "auth";
const MIN_PASSWORD_CHARS: usize = 3;

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";
pub const REGISTER_FAILED_MESSAGE: &str = "Invalid registration data";

/// Demo sign-in state for one session.
pub struct AuthService<G: PersistenceGateway> {
    gateway: G,
    user_key: String,
    token_key: String,
    user: Option<User>,
    token: Option<String>,
    last_error: Option<String>,
}

impl<G: PersistenceGateway> AuthService<G> {
    /// Restores a previously persisted sign-in, if any.
    pub fn load(gateway: G, config: &StoreConfig) -> Self {
        let user = read_key(&gateway, MODULE, &config.user_key).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|err| {
                    warn!(
                        "event=store_load module={MODULE} status=fallback error_code=decode_failed error={err}"
                    );
                })
                .ok()
        });
        let token = read_key(&gateway, MODULE, &config.token_key).filter(|value| !value.is_empty());

        let (user, token) = match (user, token) {
            (Some(user), Some(token)) => (Some(user), Some(token)),
            (Some(user), None) => (Some(user), Some(DEMO_TOKEN.to_string())),
            _ => (None, None),
        };

        Self {
            gateway,
            user_key: config.user_key.clone(),
            token_key: config.token_key.clone(),
            user,
            token,
            last_error: None,
        }
    }

    /// Signs in as the demo user when the credentials are minimally shaped.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        self.sign_in("login", email, password, LOGIN_FAILED_MESSAGE)
    }

    /// Registers and signs in; same acceptance rule as [`Self::login`].
    pub fn register(&mut self, email: &str, password: &str) -> bool {
        self.sign_in("register", email, password, REGISTER_FAILED_MESSAGE)
    }

    /// Clears the signed-in user and its persisted keys.
    pub fn logout(&mut self) {
        let was_signed_in = self.user.is_some();
        self.user = None;
        self.token = None;
        self.last_error = None;
        remove_key(&self.gateway, MODULE, &self.user_key);
        remove_key(&self.gateway, MODULE, &self.token_key);
        info!("event=auth_logout module={MODULE} status=ok was_signed_in={was_signed_in}");
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Message from the most recent failed sign-in attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn sign_in(
        &mut self,
        action: &'static str,
        email: &str,
        password: &str,
        failure: &'static str,
    ) -> bool {
        self.last_error = None;
        if !credentials_are_shaped(email, password) {
            self.last_error = Some(failure.to_string());
            info!("event=auth_{action} module={MODULE} status=rejected reason=shape");
            return false;
        }

        let user = User::demo(email);
        let token = DEMO_TOKEN.to_string();
        match serde_json::to_string(&user) {
            Ok(encoded) => {
                write_key(&self.gateway, MODULE, &self.user_key, &encoded);
                write_key(&self.gateway, MODULE, &self.token_key, &token);
            }
            Err(err) => {
                warn!(
                    "event=store_persist module={MODULE} status=dropped error_code=encode_failed error={err}"
                );
            }
        }
        self.user = Some(user);
        self.token = Some(token);
        info!("event=auth_{action} module={MODULE} status=ok");
        true
    }
}

fn credentials_are_shaped(email: &str, password: &str) -> bool {
    !email.is_empty() && password.chars().count() >= MIN_PASSWORD_CHARS
}
