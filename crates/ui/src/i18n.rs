//! Locale-keyed string table.
//!
//! The table is parsed once from `assets/i18n.json` (`key -> locale code -> text`).
//! Lookups fall back to English, then to the key itself, so a missing entry
//! is visible on screen rather than silently blank.

use std::collections::HashMap;
use std::sync::Arc;

use bda_core::model::Locale;
use thiserror::Error;

const EMBEDDED: &str = include_str!("../assets/i18n.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslationsError {
    #[error("invalid translation table: {0}")]
    Parse(#[from] serde_json::Error),
}

type Table = HashMap<String, HashMap<String, String>>;

/// Shared string table plus the active locale. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Translations {
    table: Arc<Table>,
    locale: Locale,
}

impl PartialEq for Translations {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table) && self.locale == other.locale
    }
}

impl Translations {
    /// Parses a JSON table.
    ///
    /// # Errors
    ///
    /// Returns `TranslationsError::Parse` for malformed JSON.
    pub fn from_json(json: &str, locale: Locale) -> Result<Self, TranslationsError> {
        let table: Table = serde_json::from_str(json)?;
        Ok(Self {
            table: Arc::new(table),
            locale,
        })
    }

    /// The table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `TranslationsError::Parse` if the bundled asset is malformed.
    pub fn embedded(locale: Locale) -> Result<Self, TranslationsError> {
        Self::from_json(EMBEDDED, locale)
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Same table, different locale.
    #[must_use]
    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            table: Arc::clone(&self.table),
            locale,
        }
    }

    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.lookup(key, self.locale)
            .or_else(|| self.lookup(key, Locale::En))
            .map_or_else(|| key.to_owned(), ToOwned::to_owned)
    }

    fn lookup(&self, key: &str, locale: Locale) -> Option<&str> {
        self.table
            .get(key)
            .and_then(|entry| entry.get(locale.code()))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "greet": { "en": "Hello", "ar": "مرحبا" },
        "only_en": { "en": "English only" },
        "blank_ar": { "en": "Fallback", "ar": "" }
    }"#;

    #[test]
    fn resolves_active_locale() {
        let tr = Translations::from_json(TABLE, Locale::Ar).unwrap();
        assert_eq!(tr.t("greet"), "مرحبا");
        assert_eq!(tr.with_locale(Locale::En).t("greet"), "Hello");
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let tr = Translations::from_json(TABLE, Locale::Ar).unwrap();
        assert_eq!(tr.t("only_en"), "English only");
        assert_eq!(tr.t("blank_ar"), "Fallback");
        assert_eq!(tr.t("missing.key"), "missing.key");
    }

    #[test]
    fn embedded_table_parses_and_covers_both_locales() {
        let en = Translations::embedded(Locale::En).unwrap();
        let ar = en.with_locale(Locale::Ar);
        assert_eq!(en.t("nav.mockExams"), "Mock Exams");
        assert_ne!(ar.t("nav.mockExams"), "Mock Exams");
        assert_eq!(en.t("results.performance.fail"), "You didn't pass this time. Review the material and try again.");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Translations::from_json("[1, 2]", Locale::En).is_err());
    }
}
