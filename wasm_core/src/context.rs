//! Application-wide context created once at startup and passed to every
//! page and widget that needs it.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
    De,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Self::En, Self::Es, Self::Fr, Self::De];

    /// Accepts bare or regional tags such as `es`, `es-MX`, `DE_at`.
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }
}

pub struct AppContext {
    locale: Cell<Locale>,
    store: Rc<dyn KeyValueStore>,
}

impl AppContext {
    /// Builds the context, restoring the saved language preference. An
    /// unreadable or unknown preference falls back to English.
    pub fn init(store: Rc<dyn KeyValueStore>) -> Self {
        let locale = match store.get(LANGUAGE_KEY) {
            Ok(Some(tag)) => Locale::parse(&tag).unwrap_or_default(),
            Ok(None) => Locale::default(),
            Err(err) => {
                warn!(error = %err, "language preference unreadable");
                Locale::default()
            }
        };
        debug!(locale = locale.tag(), "app context initialized");
        Self {
            locale: Cell::new(locale),
            store,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    pub fn set_locale(&self, locale: Locale) -> Result<(), StorageError> {
        self.locale.set(locale);
        self.store.set(LANGUAGE_KEY, locale.tag())
    }

    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        Rc::clone(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn locale_parse_accepts_regional_tags() {
        assert_eq!(Locale::parse("es-MX"), Some(Locale::Es));
        assert_eq!(Locale::parse(" DE_at "), Some(Locale::De));
        assert_eq!(Locale::parse("pt"), None);
    }

    #[test]
    fn locale_preference_persists_across_init() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let ctx = AppContext::init(Rc::clone(&store));
        assert_eq!(ctx.locale(), Locale::En);
        ctx.set_locale(Locale::Fr).unwrap();
        assert_eq!(AppContext::init(store).locale(), Locale::Fr);
    }

    #[test]
    fn unknown_saved_locale_falls_back() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "klingon").unwrap();
        assert_eq!(AppContext::init(store).locale(), Locale::En);
    }
}
