//! Top-level facade wiring the collaborators together.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::guard::NavigationGuard;
use crate::http::ApiClient;
use crate::realtime::RealtimeTransport;
use crate::routes::default_routes;
use crate::session::{Session, SessionStore};
use crate::storage::KeyValueStorage;
use crate::stores::{BookingStore, CurrencyStore, DashboardStore, ExamStore};
use crate::upload::Uploader;

/// One client instance owns one session context; multiple clients with
/// separate storage backends are fully independent.
pub struct Client {
    config: ClientConfig,
    session: Session,
    api: ApiClient,
    auth: SessionStore,
    guard: NavigationGuard,
    realtime: RealtimeTransport,
}

impl Client {
    /// Builds a client, restoring any persisted session from `storage`.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        config.validate()?;
        let session = Session::load(storage);
        let api = ApiClient::new(&config, session.clone())?;
        let auth = SessionStore::new(session.clone(), api.clone());
        let guard = NavigationGuard::new(default_routes(), auth.clone());
        let realtime = RealtimeTransport::new(&config);
        Ok(Self {
            config,
            session,
            api,
            auth,
            guard,
            realtime,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Authentication and profile operations.
    pub fn auth(&self) -> &SessionStore {
        &self.auth
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn realtime(&self) -> &RealtimeTransport {
        &self.realtime
    }

    /// Domain stores are created on demand; each owns its own cached state.
    pub fn dashboard(&self) -> DashboardStore {
        DashboardStore::new(self.api.clone(), self.session.clone())
    }

    pub fn booking(&self) -> BookingStore {
        BookingStore::new(self.api.clone())
    }

    pub fn exams(&self) -> ExamStore {
        ExamStore::new(self.api.clone())
    }

    pub fn currency(&self) -> CurrencyStore {
        CurrencyStore::new(self.api.clone())
    }

    pub fn uploader(&self) -> Uploader {
        Uploader::new(self.api.clone(), &self.config)
    }
}
