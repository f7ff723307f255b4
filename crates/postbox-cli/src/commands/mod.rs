//! Subcommand implementations.

pub mod auth;
pub mod config;
pub mod mail;
pub mod theme;

use anyhow::{Context, Result};
use postbox_application::{AppContext, AuthService, MailboxService, SettingsService};
use postbox_core::config::ClientConfig;
use postbox_core::mail::MailApi;
use postbox_infrastructure::{ConfigService, FileKeyValueStore, PostboxPaths};
use postbox_interaction::HttpMailApi;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Everything a command needs, wired once per invocation.
pub struct Runtime {
    pub config_service: ConfigService,
    pub config: ClientConfig,
    pub context: AppContext,
    pub api: Arc<dyn MailApi>,
}

impl Runtime {
    pub async fn open(
        config_path: Option<PathBuf>,
        state_dir: Option<PathBuf>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let paths = PostboxPaths::new(state_dir);
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(&paths)?,
        };
        let config = config_service
            .get_config()
            .context("Failed to load config.toml")?
            .with_env_overrides()
            .with_overrides(api_url, None);

        init_tracing(&config.log_level);

        let store = Arc::new(FileKeyValueStore::from_paths(&paths)?);
        tracing::debug!(path = %store.path().display(), "using state document");
        let context = AppContext::bootstrap(store).await;
        let api: Arc<dyn MailApi> = Arc::new(HttpMailApi::from_config(&config)?);

        Ok(Self {
            config_service,
            config,
            context,
            api,
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.api), self.context.auth())
    }

    pub fn mailbox(&self) -> MailboxService {
        MailboxService::new(Arc::clone(&self.api), self.context.auth())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.context.theme())
    }
}

/// Logs to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
