// src/app/prefs.rs
use eframe::egui as eg;
use tracing::debug;

use crate::app::storage::{Store, KEY_THEME};
use crate::app::types::Theme;

impl crate::app::CineVaultApp {
    pub(crate) fn load_prefs(&mut self) {
        self.theme = load_theme(&self.store);
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        save_theme(&self.store, self.theme);
    }

    /// Push the theme into egui only when it changed.
    pub(crate) fn apply_theme(&mut self, ctx: &eg::Context) {
        if self.theme_applied == Some(self.theme) {
            return;
        }
        ctx.set_visuals(match self.theme {
            Theme::Dark => eg::Visuals::dark(),
            Theme::Light => eg::Visuals::light(),
        });
        self.theme_applied = Some(self.theme);
    }
}

/// Anything but a known value means dark.
pub fn load_theme(store: &Store) -> Theme {
    store
        .read_value(KEY_THEME)
        .and_then(|v| v.trim().parse::<Theme>().ok())
        .unwrap_or_default()
}

pub fn save_theme(store: &Store, theme: Theme) {
    debug!("theme -> {}", theme.as_str());
    store.write_value(KEY_THEME, theme.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_missing_theme_is_dark() {
        let store = Store::in_memory();
        assert_eq!(load_theme(&store), Theme::Dark);
        store.write_value(KEY_THEME, "\"sepia\"");
        assert_eq!(load_theme(&store), Theme::Dark);
    }

    #[test]
    fn saved_theme_round_trips() {
        let store = Store::in_memory();
        save_theme(&store, Theme::Light);
        assert_eq!(store.read_value(KEY_THEME).as_deref(), Some("light"));
        assert_eq!(load_theme(&store), Theme::Light);
    }
}
