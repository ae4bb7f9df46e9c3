use crate::logging::{self, obj, v_str, Domain};
use crate::storage::KvStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Terminal hint from `COLORFGBG` ("fg;bg"); a low background index
    /// means a dark terminal.
    pub fn system_default() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
            .map(|bg| if bg < 7 || bg == 8 { Theme::Dark } else { Theme::Light })
            .unwrap_or(Theme::Light)
    }
}

/// Stored preference, `None` when unset or unreadable.
pub fn load_theme<S: KvStore>(store: &S) -> Option<Theme> {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw),
        Ok(None) => None,
        Err(err) => {
            logging::warn(Domain::Store, "theme_read_failed", obj(&[("error", v_str(&err.to_string()))]));
            None
        }
    }
}

pub fn save_theme<S: KvStore>(store: &mut S, theme: Theme) {
    if let Err(err) = store.set(THEME_KEY, theme.as_str()) {
        logging::error(Domain::Store, "theme_write_failed", obj(&[("error", v_str(&err.to_string()))]));
        return;
    }
    logging::info(Domain::Theme, "theme_saved", obj(&[("theme", v_str(theme.as_str()))]));
}

/// Stored preference, falling back to `system` when nothing is stored.
pub fn effective_theme<S: KvStore>(store: &S, system: Theme) -> Theme {
    load_theme(store).unwrap_or(system)
}

/// Flip the effective theme and persist the result.
pub fn toggle_theme<S: KvStore>(store: &mut S, system: Theme) -> Theme {
    let next = effective_theme(store, system).toggled();
    save_theme(store, next);
    next
}
