//! Application state shared across route handlers.
//!
//! Holds the database connection plus the externally reached services (object
//! storage and mail), constructed once at startup and passed in explicitly
//! rather than living in process-wide globals.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::email::Mailer;
use crate::services::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    storage: Arc<dyn FileStore>,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn FileStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, storage, mailer }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn storage(&self) -> &dyn FileStore {
        self.storage.as_ref()
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }
}
