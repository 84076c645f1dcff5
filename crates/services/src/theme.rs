use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use storage::repository::{KeyValueStore, StorageError};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown stored values read as light.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon of the toggle button: the theme a click switches to.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "fa-sun",
            Theme::Light => "fa-moon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light/dark preference kept in the persistent scope.
pub struct ThemeManager {
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<Theme>,
}

impl ThemeManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(Theme::default());
        Self { store, state }
    }

    /// Read the stored preference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn load(&self) -> Result<Theme, StorageError> {
        let theme = self
            .store
            .get(THEME_KEY)
            .await?
            .map(|raw| Theme::parse(&raw))
            .unwrap_or_default();
        self.state.send_replace(theme);
        debug!(%theme, "theme loaded");
        Ok(theme)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        *self.state.borrow()
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.state.subscribe()
    }

    /// Apply and persist `theme`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preference cannot be saved; the theme is
    /// still applied for this run.
    pub async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.state.send_replace(theme);
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the preference cannot be saved.
    pub async fn toggle(&self) -> Result<Theme, StorageError> {
        let next = self.theme().toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn defaults_to_light() {
        let themes = ThemeManager::new(Arc::new(InMemoryStore::new()));
        assert_eq!(themes.load().await.unwrap(), Theme::Light);
        assert_eq!(themes.theme().icon(), "fa-moon");
    }

    #[tokio::test]
    async fn toggle_persists() {
        let store = Arc::new(InMemoryStore::new());
        let themes = ThemeManager::new(store.clone());
        assert_eq!(themes.toggle().await.unwrap(), Theme::Dark);
        assert!(themes.is_dark());
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeManager::new(store);
        assert_eq!(reloaded.load().await.unwrap(), Theme::Dark);
        assert_eq!(reloaded.theme().icon(), "fa-sun");
    }

    #[test]
    fn unknown_values_read_as_light() {
        assert_eq!(Theme::parse("solarized"), Theme::Light);
        assert_eq!(Theme::parse(" DARK "), Theme::Dark);
    }
}
