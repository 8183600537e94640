use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::events::repo::{EventRepository, PgEventRepository};
use crate::notify::{self, Notifier};
use crate::users::repo::{PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Production wiring: Postgres-backed repositories and the configured mailer.
    pub fn init(config: Arc<AppConfig>, db: PgPool) -> Self {
        let notifier = notify::from_config(&config.mail);
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            events: Arc::new(PgEventRepository::new(db)),
            notifier,
            config,
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            users,
            events,
            notifier,
        }
    }
}
