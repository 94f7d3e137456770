//! Picks a [`LanguageAdapter`] for each file.

use camino::Utf8Path;
use once_cell::sync::OnceCell;
use sift_core::{AdapterResolver, ParserAdapter, WildcardSyntax};
use tracing::warn;

use crate::adapter::LanguageAdapter;
use crate::language::SupportedLanguage;

/// Resolves file paths to adapters, creating each adapter on first use.
pub struct AdapterRegistry {
    wildcards: WildcardSyntax,
    forced: Option<SupportedLanguage>,
    adapters: [OnceCell<Option<LanguageAdapter>>; 9],
}

impl AdapterRegistry {
    /// Creates a registry whose adapters recognise the given wildcard
    /// markers.
    #[must_use]
    pub const fn new(wildcards: WildcardSyntax) -> Self {
        Self {
            wildcards,
            forced: None,
            adapters: [const { OnceCell::new() }; 9],
        }
    }

    /// Parses every file as `language`, ignoring extensions.
    #[must_use]
    pub const fn with_language(mut self, language: Option<SupportedLanguage>) -> Self {
        self.forced = language;
        self
    }

    /// Returns the language a path is parsed as, if any.
    #[must_use]
    pub fn language_for(&self, path: &Utf8Path) -> Option<SupportedLanguage> {
        self.forced.or_else(|| SupportedLanguage::from_path(path))
    }

    /// Returns the adapter for `language`, creating it if needed.
    ///
    /// Returns `None`, after logging a warning, when the grammar cannot be
    /// loaded.
    #[must_use]
    pub fn adapter(&self, language: SupportedLanguage) -> Option<&LanguageAdapter> {
        let cell = self.adapters.get(language.index())?;
        cell.get_or_init(|| {
            LanguageAdapter::new(language, self.wildcards.clone())
                .inspect_err(|err| warn!(%language, %err, "grammar unavailable"))
                .ok()
        })
        .as_ref()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new(WildcardSyntax::default())
    }
}

impl AdapterResolver for AdapterRegistry {
    fn resolve(&self, path: &Utf8Path) -> Option<&dyn ParserAdapter> {
        let language = self.language_for(path)?;
        self.adapter(language)
            .map(|adapter| adapter as &dyn ParserAdapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> AdapterRegistry {
        AdapterRegistry::default()
    }

    #[rstest]
    #[case("app/main.js", Some("javascript"))]
    #[case("lib.rs", Some("rust"))]
    #[case("index.html", Some("html"))]
    #[case("notes.txt", None)]
    fn resolves_by_extension(
        registry: AdapterRegistry,
        #[case] path: &str,
        #[case] expected: Option<&str>,
    ) {
        let name = registry
            .resolve(Utf8Path::new(path))
            .map(ParserAdapter::name);
        assert_eq!(name, expected);
    }

    #[rstest]
    fn forced_language_wins(registry: AdapterRegistry) {
        let forced = registry.with_language(Some(SupportedLanguage::Python));
        let name = forced
            .resolve(Utf8Path::new("script.txt"))
            .map(ParserAdapter::name);
        assert_eq!(name, Some("python"));
    }

    #[rstest]
    fn adapters_are_created_once(registry: AdapterRegistry) {
        let first = registry.adapter(SupportedLanguage::Css).map(std::ptr::from_ref);
        let second = registry.adapter(SupportedLanguage::Css).map(std::ptr::from_ref);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
