//! Application state wiring all services together.
//!
//! Services are generic over the repository/publisher traits; AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use guildkeeper_core::commit::CommitService;
use guildkeeper_core::service::WizardService;
use guildkeeper_core::session::SessionStore;
use guildkeeper_core::sync::SyncScheduler;
use guildkeeper_core::wizard::WizardEngine;
use guildkeeper_infra::sheet::{DisabledSheetPublisher, HttpSheetPublisher};
use guildkeeper_infra::sqlite::{
    DatabasePool, SqliteCharacterRepository, SqliteTimezoneRepository,
};
use guildkeeper_types::config::AppConfig;

/// The wizard service pinned to the SQLite implementations.
pub type ConcreteWizardService =
    WizardService<SqliteCharacterRepository, SqliteTimezoneRepository>;

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub wizard: Arc<ConcreteWizardService>,
}

impl AppState {
    /// Connect to the database and wire every service and background task.
    ///
    /// The sweeper and scheduler run until `shutdown` is cancelled.
    pub async fn init(
        config: AppConfig,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let database_url = config
            .database_url
            .clone()
            .unwrap_or_else(guildkeeper_infra::sqlite::pool::default_database_url);
        let pool = DatabasePool::new(&database_url).await?;

        let characters = Arc::new(SqliteCharacterRepository::new(pool.clone()));
        let timezones = Arc::new(SqliteTimezoneRepository::new(pool));

        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session.ttl_secs,
        )));
        let _sweeper = sessions.spawn_sweeper(
            Duration::from_secs(config.session.sweep_interval_secs),
            shutdown.clone(),
        );

        // One scheduler task regardless of whether pushes are enabled, so
        // the commit path never special-cases the sheet config
        let scheduler = match &config.sheet.endpoint {
            Some(endpoint) => SyncScheduler::spawn(
                characters.clone(),
                Arc::new(HttpSheetPublisher::new(
                    endpoint.clone(),
                    config.sheet.token.clone(),
                )),
                config.sync.clone(),
                shutdown.clone(),
            ),
            None => SyncScheduler::spawn(
                characters.clone(),
                Arc::new(DisabledSheetPublisher),
                config.sync.clone(),
                shutdown.clone(),
            ),
        };

        let commit = CommitService::new(
            characters.clone(),
            timezones,
            sessions.clone(),
            scheduler.notifier(),
        );
        let engine = WizardEngine::new(config.guilds.clone());
        let wizard = Arc::new(WizardService::new(
            engine,
            sessions,
            characters,
            commit,
        ));

        Ok(Self { wizard })
    }
}
