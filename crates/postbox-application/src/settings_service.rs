//! Settings screen use cases.

use postbox_core::Result;
use postbox_core::theme::{Theme, ThemeState, catalog};
use std::sync::Arc;

pub struct SettingsService {
    theme: Arc<ThemeState>,
}

impl SettingsService {
    pub fn new(theme: Arc<ThemeState>) -> Self {
        Self { theme }
    }

    pub fn themes(&self) -> &'static [Theme] {
        catalog()
    }

    pub fn current_theme(&self) -> Theme {
        self.theme.current_value()
    }

    /// Switches the active theme. Returns whether `id` named a catalog theme.
    pub async fn switch_theme(&self, id: &str) -> Result<bool> {
        self.theme.update(id).await
    }
}
