use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

/// Localized text lookup.
///
/// Lookups fall back from the requested locale to the provider's default locale and finally
/// to the key itself, so a missing translation shows up as its raw key instead of failing.
pub trait TextProvider {
    fn text(&self, key: &str, locale: &str) -> String;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextCatalog {
    default_locale: String,
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl TextCatalog {
    pub fn new(default_locale: &str) -> Self {
        Self {
            default_locale: default_locale.to_string(),
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries(
        default_locale: &str,
        entries: BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        Self {
            default_locale: default_locale.to_string(),
            entries,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn insert(&mut self, locale: &str, key: &str, text: &str) {
        self.entries
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.entries
            .get(locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}

impl TextProvider for TextCatalog {
    fn text(&self, key: &str, locale: &str) -> String {
        if let Some(text) = self.lookup(locale, key) {
            return text.to_string();
        }
        if let Some(text) = self.lookup(&self.default_locale, key) {
            return text.to_string();
        }
        trace!(key = key, locale = locale; "Missing translation");
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_follows_fallback_chain() {
        let mut catalog = TextCatalog::new("de");
        catalog.insert("de", "tour.title", "Rundgang");
        catalog.insert("en", "tour.title", "Tour");
        catalog.insert("de", "tour.subtitle", "Überblick");

        assert_eq!(catalog.text("tour.title", "en"), "Tour");
        assert_eq!(catalog.text("tour.subtitle", "en"), "Überblick");
        assert_eq!(catalog.text("tour.missing", "en"), "tour.missing");
    }

    #[test]
    fn locales_lists_loaded_tables() {
        let mut catalog = TextCatalog::new("de");
        catalog.insert("fr", "a", "b");
        catalog.insert("de", "a", "c");
        assert_eq!(catalog.locales().collect::<Vec<_>>(), vec!["de", "fr"]);
    }
}
