//! Application context.
//!
//! Owns the theme and sign-in containers for the lifetime of the app and
//! hands them to whatever needs them. Screens hold a [`ContextHandle`];
//! using a handle after its context is gone is an error, never a silent
//! default.

use postbox_core::auth::AuthState;
use postbox_core::storage::KeyValueStore;
use postbox_core::theme::ThemeState;
use postbox_core::{PostboxError, Result};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;

#[derive(Debug)]
struct Containers {
    theme: Arc<ThemeState>,
    auth: Arc<AuthState>,
}

/// The single owner of the app's persisted state containers.
#[derive(Debug)]
pub struct AppContext {
    containers: Arc<Containers>,
}

impl AppContext {
    /// Creates both containers at their bootstrap values. Performs no I/O.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let containers = Containers {
            theme: Arc::new(ThemeState::initialize(Arc::clone(&store))),
            auth: Arc::new(AuthState::initialize(store)),
        };
        Self {
            containers: Arc::new(containers),
        }
    }

    /// Creates the context and waits until both containers have loaded.
    pub async fn bootstrap(store: Arc<dyn KeyValueStore>) -> Self {
        let context = Self::new(store);
        context.load().await;
        context
    }

    /// Loads both containers concurrently.
    pub async fn load(&self) {
        tokio::join!(self.containers.theme.load(), self.containers.auth.load());
        tracing::debug!(
            theme = %self.containers.theme.current_value().id,
            signed_in = self.containers.auth.is_signed_in(),
            "application state loaded"
        );
    }

    /// Starts loading in the background and returns immediately.
    ///
    /// Until the task finishes, readers see the bootstrap values. Must be
    /// called from within a tokio runtime.
    pub fn spawn_load(&self) -> JoinHandle<()> {
        let theme = Arc::clone(&self.containers.theme);
        let auth = Arc::clone(&self.containers.auth);
        tokio::spawn(async move {
            tokio::join!(theme.load(), auth.load());
        })
    }

    pub fn theme(&self) -> Arc<ThemeState> {
        Arc::clone(&self.containers.theme)
    }

    pub fn auth(&self) -> Arc<AuthState> {
        Arc::clone(&self.containers.auth)
    }

    /// Whether both containers have finished loading.
    pub fn is_loaded(&self) -> bool {
        self.containers.theme.is_loaded() && self.containers.auth.is_loaded()
    }

    /// A non-owning handle for consumers further down the tree.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            containers: Arc::downgrade(&self.containers),
        }
    }
}

/// Weak reference to an [`AppContext`].
#[derive(Debug, Clone)]
pub struct ContextHandle {
    containers: Weak<Containers>,
}

impl ContextHandle {
    /// The theme container, or `ContextUnavailable` once the context is gone.
    pub fn theme(&self) -> Result<Arc<ThemeState>> {
        self.upgrade("theme").map(|c| Arc::clone(&c.theme))
    }

    /// The sign-in container, or `ContextUnavailable` once the context is gone.
    pub fn auth(&self) -> Result<Arc<AuthState>> {
        self.upgrade("auth").map(|c| Arc::clone(&c.auth))
    }

    fn upgrade(&self, which: &'static str) -> Result<Arc<Containers>> {
        self.containers
            .upgrade()
            .ok_or(PostboxError::ContextUnavailable(which))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postbox_core::auth::AuthSession;
    use postbox_core::storage::MemoryStore;
    use postbox_core::theme::DEFAULT_THEME_ID;

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::with_entry("theme", "ocean");
        store
            .set("auth_session", r#"{"userId":"u1","email":"a@b.com"}"#)
            .await
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_new_starts_at_defaults_without_io() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(true);
        store.fail_writes(true);

        let context = AppContext::new(store);
        assert_eq!(context.theme().current_value().id, DEFAULT_THEME_ID);
        assert!(context.auth().current_value().is_none());
        assert!(!context.is_loaded());
    }

    #[tokio::test]
    async fn test_bootstrap_restores_persisted_state() {
        let store = seeded_store().await;
        let context = AppContext::bootstrap(store).await;

        assert!(context.is_loaded());
        assert_eq!(context.theme().current_value().id, "ocean");
        assert_eq!(context.auth().user_id().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_spawn_load_completes_in_background() {
        let store = seeded_store().await;
        let context = AppContext::new(store);

        context.spawn_load().await.unwrap();
        assert!(context.is_loaded());
        assert_eq!(context.theme().current_value().id, "ocean");
    }

    #[tokio::test]
    async fn test_handle_shares_containers() {
        let context = AppContext::new(Arc::new(MemoryStore::new()));
        let handle = context.handle();

        let session = AuthSession::new("u7", "x@y.com").unwrap();
        handle.auth().unwrap().sign_in(session.clone()).await.unwrap();
        assert!(handle.theme().unwrap().update("forest").await.unwrap());

        assert_eq!(context.auth().current_value(), Some(session));
        assert_eq!(context.theme().current_value().id, "forest");
    }

    #[test]
    fn test_handle_fails_after_context_dropped() {
        let context = AppContext::new(Arc::new(MemoryStore::new()));
        let handle = context.handle();
        drop(context);

        assert!(matches!(
            handle.theme(),
            Err(PostboxError::ContextUnavailable("theme"))
        ));
        assert!(matches!(
            handle.auth(),
            Err(PostboxError::ContextUnavailable("auth"))
        ));
    }
}
