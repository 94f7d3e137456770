//! Language detection and Tree-sitter grammar selection.
//!
//! [`SupportedLanguage`] maps file extensions and user-supplied names to the
//! Tree-sitter grammar and node-type tables bundled with each grammar crate.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use thiserror::Error;

/// Languages the search can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportedLanguage {
    /// JavaScript and JSX (`.js`, `.jsx`, `.mjs`, `.cjs`).
    JavaScript,
    /// TypeScript (`.ts`, `.mts`, `.cts`).
    TypeScript,
    /// TypeScript with JSX (`.tsx`).
    Tsx,
    /// Python (`.py`, `.pyi`).
    Python,
    /// C# (`.cs`).
    CSharp,
    /// CSS stylesheets (`.css`).
    Css,
    /// HTML documents (`.html`, `.htm`).
    Html,
    /// Rust (`.rs`).
    Rust,
    /// Lua (`.lua`).
    Lua,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "py" | "pyi" => Some(Self::Python),
            "cs" => Some(Self::CSharp),
            "css" => Some(Self::Css),
            "html" | "htm" => Some(Self::Html),
            "rs" => Some(Self::Rust),
            "lua" => Some(Self::Lua),
            _ => None,
        }
    }

    /// Detects the language from a file path by examining its extension.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Self::Css => tree_sitter_css::LANGUAGE.into(),
            Self::Html => tree_sitter_html::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Lua => tree_sitter_lua::LANGUAGE.into(),
        }
    }

    /// Returns the grammar's `node-types.json` document.
    #[must_use]
    pub const fn node_types_json(self) -> &'static str {
        match self {
            Self::JavaScript => tree_sitter_javascript::NODE_TYPES,
            Self::TypeScript => tree_sitter_typescript::TYPESCRIPT_NODE_TYPES,
            Self::Tsx => tree_sitter_typescript::TSX_NODE_TYPES,
            Self::Python => tree_sitter_python::NODE_TYPES,
            Self::CSharp => tree_sitter_c_sharp::NODE_TYPES,
            Self::Css => tree_sitter_css::NODE_TYPES,
            Self::Html => tree_sitter_html::NODE_TYPES,
            Self::Rust => tree_sitter_rust::NODE_TYPES,
            Self::Lua => tree_sitter_lua::NODE_TYPES,
        }
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Python => "python",
            Self::CSharp => "csharp",
            Self::Css => "css",
            Self::Html => "html",
            Self::Rust => "rust",
            Self::Lua => "lua",
        }
    }

    /// Returns all supported languages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::JavaScript,
            Self::TypeScript,
            Self::Tsx,
            Self::Python,
            Self::CSharp,
            Self::Css,
            Self::Html,
            Self::Rust,
            Self::Lua,
        ]
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a language identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "javascript" | "js" | "jsx" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "python" | "py" => Ok(Self::Python),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "css" => Ok(Self::Css),
            "html" | "htm" => Ok(Self::Html),
            "rust" | "rs" => Ok(Self::Rust),
            "lua" => Ok(Self::Lua),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("js", SupportedLanguage::JavaScript)]
    #[case("jsx", SupportedLanguage::JavaScript)]
    #[case("mjs", SupportedLanguage::JavaScript)]
    #[case("ts", SupportedLanguage::TypeScript)]
    #[case("cts", SupportedLanguage::TypeScript)]
    #[case("tsx", SupportedLanguage::Tsx)]
    #[case("py", SupportedLanguage::Python)]
    #[case("pyi", SupportedLanguage::Python)]
    #[case("cs", SupportedLanguage::CSharp)]
    #[case("CSS", SupportedLanguage::Css)]
    #[case("htm", SupportedLanguage::Html)]
    #[case("rs", SupportedLanguage::Rust)]
    #[case("lua", SupportedLanguage::Lua)]
    fn from_extension_recognises_supported_languages(
        #[case] ext: &str,
        #[case] expected: SupportedLanguage,
    ) {
        assert_eq!(SupportedLanguage::from_extension(ext), Some(expected));
    }

    #[rstest]
    #[case("json")]
    #[case("rb")]
    #[case("")]
    fn from_extension_returns_none_for_unknown(#[case] ext: &str) {
        assert_eq!(SupportedLanguage::from_extension(ext), None);
    }

    #[rstest]
    #[case("src/App.tsx", Some(SupportedLanguage::Tsx))]
    #[case("pkg/mod.py", Some(SupportedLanguage::Python))]
    #[case("Makefile", None)]
    fn from_path_reads_extension(
        #[case] path: &str,
        #[case] expected: Option<SupportedLanguage>,
    ) {
        assert_eq!(SupportedLanguage::from_path(Utf8Path::new(path)), expected);
    }

    #[rstest]
    #[case("JavaScript", SupportedLanguage::JavaScript)]
    #[case(" c# ", SupportedLanguage::CSharp)]
    #[case("TSX", SupportedLanguage::Tsx)]
    fn from_str_parses_language_names(#[case] input: &str, #[case] expected: SupportedLanguage) {
        assert_eq!(SupportedLanguage::from_str(input), Ok(expected));
    }

    #[test]
    fn from_str_reports_the_rejected_input() {
        let err = "Ruby".parse::<SupportedLanguage>().expect_err("ruby is unsupported");
        assert_eq!(err.input(), "ruby");
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for language in SupportedLanguage::all() {
            assert_eq!(language.to_string().parse::<SupportedLanguage>(), Ok(*language));
        }
    }
}
