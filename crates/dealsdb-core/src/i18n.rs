use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Locale every catalog falls back to.
pub const FALLBACK_LOCALE: &str = "en";

/// Translation texts for all supported locales, as stored in `translations.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Translations {
    pub locales: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    /// Resolves the catalog for `locale`.
    ///
    /// Tries the exact code, then its primary subtag (`de-AT` → `de`), then
    /// [`FALLBACK_LOCALE`]. When nothing matches, the returned catalog is
    /// empty and every lookup yields the caller's built-in text.
    #[must_use]
    pub fn catalog(&self, locale: &str) -> Catalog {
        let requested = locale.trim().to_lowercase();
        let primary = requested
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_string();

        for candidate in [requested.as_str(), primary.as_str(), FALLBACK_LOCALE] {
            if let Some(entries) = self.locales.get(candidate) {
                if candidate != requested {
                    tracing::debug!(requested = %locale, resolved = candidate, "locale fallback");
                }
                return Catalog {
                    locale: candidate.to_string(),
                    entries: entries.clone(),
                };
            }
        }

        Catalog::default()
    }
}

/// Texts for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            locale: FALLBACK_LOCALE.to_string(),
            entries: HashMap::new(),
        }
    }
}

impl Catalog {
    #[must_use]
    pub fn new(locale: &str, entries: HashMap<String, String>) -> Self {
        Self {
            locale: locale.to_string(),
            entries,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns `true` for German catalogs, which show the native description.
    #[must_use]
    pub fn is_german(&self) -> bool {
        self.locale == "de"
    }

    /// Looks up `key`, falling back to `fallback` when missing or blank.
    #[must_use]
    pub fn text<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// Load and validate the translations file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_translations(path: &Path) -> Result<Translations, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::TranslationsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

    let translations: Translations =
        serde_yaml::from_str(&content).map_err(ConfigError::TranslationsFileParse)?;

    validate_translations(&translations)?;

    Ok(translations)
}

fn validate_translations(translations: &Translations) -> Result<(), ConfigError> {
    if !translations.locales.contains_key(FALLBACK_LOCALE) {
        return Err(ConfigError::Validation(format!(
            "fallback locale '{FALLBACK_LOCALE}' is missing"
        )));
    }

    for (locale, entries) in &translations.locales {
        if locale.trim().is_empty() || locale.to_lowercase() != *locale {
            return Err(ConfigError::Validation(format!(
                "locale code '{locale}' must be non-empty lowercase"
            )));
        }
        if let Some((key, _)) = entries.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "locale '{locale}' has an empty text for '{key}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Translations {
        serde_yaml::from_str(
            r#"
locales:
  en:
    results.count: Results
    results.categories: Categories
  de:
    results.count: Ergebnisse
"#,
        )
        .unwrap()
    }

    #[test]
    fn catalog_resolves_exact_locale() {
        let catalog = sample().catalog("de");
        assert_eq!(catalog.locale(), "de");
        assert!(catalog.is_german());
        assert_eq!(catalog.text("results.count", "Results"), "Ergebnisse");
    }

    #[test]
    fn catalog_uses_primary_subtag() {
        let catalog = sample().catalog("de-AT");
        assert_eq!(catalog.locale(), "de");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let catalog = sample().catalog("fr");
        assert_eq!(catalog.locale(), "en");
        assert_eq!(catalog.text("results.categories", "x"), "Categories");
    }

    #[test]
    fn missing_key_uses_builtin_text() {
        let catalog = sample().catalog("de");
        assert_eq!(catalog.text("results.categories", "Categories"), "Categories");
        assert_eq!(Catalog::default().text("anything", "fallback"), "fallback");
    }

    #[test]
    fn validation_requires_english() {
        let t: Translations = serde_yaml::from_str("locales:\n  de:\n    a: b\n").unwrap();
        let err = validate_translations(&t).unwrap_err();
        assert!(err.to_string().contains("fallback locale"));
    }

    #[test]
    fn validation_rejects_blank_text() {
        let t: Translations =
            serde_yaml::from_str("locales:\n  en:\n    results.count: \"  \"\n").unwrap();
        let err = validate_translations(&t).unwrap_err();
        assert!(err.to_string().contains("results.count"));
    }

    #[test]
    fn load_translations_reports_missing_file() {
        let err = load_translations(Path::new("/nonexistent/translations.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TranslationsFileIo { .. }));
    }

    #[test]
    fn load_translations_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("translations.yaml");
        let translations = load_translations(&path).expect("failed to load translations.yaml");
        let de = translations.catalog("de");
        assert_eq!(de.locale(), "de");
        assert_ne!(de.text("results.count", "Results"), "Results");
    }
}
