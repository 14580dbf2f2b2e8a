use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{AccountStore, SessionStore},
    error::AppResult,
    middleware::session::SessionToken,
    models::Account,
    services::{Matcher, Narrator},
};

/// Shared application state
///
/// The matcher is immutable after startup; stores are injected capabilities
/// so handlers can run against in-memory implementations in tests.
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub narrator: Narrator,
}

impl AppState {
    pub fn new(
        matcher: Arc<Matcher>,
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        narrator: Narrator,
    ) -> Self {
        Self {
            matcher,
            accounts,
            sessions,
            narrator,
        }
    }

    /// Resolves a session token to the logged-in account id, if valid
    pub async fn session_account_id(&self, token: &SessionToken) -> AppResult<Option<Uuid>> {
        match &token.0 {
            Some(token) => self.sessions.get(token).await,
            None => Ok(None),
        }
    }

    /// Resolves a session token all the way to the owning account
    pub async fn session_account(&self, token: &SessionToken) -> AppResult<Option<Account>> {
        match self.session_account_id(token).await? {
            Some(id) => self.accounts.find(id).await,
            None => Ok(None),
        }
    }
}
